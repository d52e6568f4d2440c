//! Distance-based switch between the volumetric and point representations.

use crate::entity::{Entity, Representation};
use glam::DVec3;

#[derive(Debug, Clone, Copy)]
pub struct RepresentationSwitch {
    /// Switch distance in scaled units.
    threshold: f64,
}

impl RepresentationSwitch {
    /// `visibility_distance` is in dataset units (km); the threshold is kept
    /// in scaled units.
    pub fn new(visibility_distance: f64, scaling_factor: f64) -> Self {
        Self::with_threshold(visibility_distance / scaling_factor)
    }

    pub fn with_threshold(threshold: f64) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Representation for a camera at `distance`. Exactly at the threshold the
    /// point form wins; there is no hysteresis.
    #[inline]
    pub fn active_for(&self, distance: f64) -> Representation {
        if distance < self.threshold {
            Representation::Volumetric
        } else {
            Representation::Point
        }
    }

    /// Runs once per frame per entity. Leaves the outline untouched.
    pub fn update(&self, entity: &mut Entity, camera: DVec3) -> Representation {
        let active = self.active_for(camera.distance(entity.position()));
        entity.set_visible(Representation::Volumetric, active == Representation::Volumetric);
        entity.set_visible(Representation::Point, active == Representation::Point);
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use proptest::prelude::*;

    fn entity_at(p: DVec3) -> Entity {
        let mut e = Entity::new(EntityId(0), "Jupiter", 1.0, [1.0; 3]);
        e.apply_position(Some(p));
        e
    }

    #[test]
    fn threshold_is_in_scaled_units() {
        assert_eq!(RepresentationSwitch::new(5e9, 1e6).threshold(), 5000.0);
    }

    #[test]
    fn near_shows_sphere_far_shows_point() {
        let lod = RepresentationSwitch::with_threshold(100.0);
        let mut e = entity_at(DVec3::ZERO);

        assert_eq!(lod.update(&mut e, DVec3::new(0.0, 0.0, 99.0)), Representation::Volumetric);
        assert!(e.shows(Representation::Volumetric));
        assert!(!e.shows(Representation::Point));

        assert_eq!(lod.update(&mut e, DVec3::new(0.0, 0.0, 101.0)), Representation::Point);
        assert!(!e.shows(Representation::Volumetric));
        assert!(e.shows(Representation::Point));
    }

    #[test]
    fn exactly_at_threshold_shows_point() {
        let lod = RepresentationSwitch::with_threshold(5.0);
        let mut e = entity_at(DVec3::ZERO);

        assert_eq!(lod.update(&mut e, DVec3::new(3.0, 4.0, 0.0)), Representation::Point);
    }

    #[test]
    fn outline_is_left_alone() {
        let lod = RepresentationSwitch::with_threshold(10.0);
        let mut e = entity_at(DVec3::ZERO);
        e.set_visible(Representation::Outline, true);

        lod.update(&mut e, DVec3::splat(100.0));
        assert!(e.shows(Representation::Outline));
        lod.update(&mut e, DVec3::ZERO);
        assert!(e.shows(Representation::Outline));
    }

    proptest! {
        #[test]
        fn exactly_one_form_is_visible(
            threshold in 0.1f64..1e4,
            x in -1e5f64..1e5,
            y in -1e5f64..1e5,
            z in -1e5f64..1e5,
        ) {
            let lod = RepresentationSwitch::with_threshold(threshold);
            let mut e = entity_at(DVec3::new(1.0, -2.0, 3.0));
            lod.update(&mut e, DVec3::new(x, y, z));

            prop_assert!(e.shows(Representation::Volumetric) ^ e.shows(Representation::Point));
        }
    }
}
