//! Scene entities: one per catalog body, created at startup and kept for the
//! whole session.

use crate::catalog::Catalog;
use glam::DVec3;
use std::collections::HashMap;

/// Index of an entity in the [`EntityRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub usize);

/// The visual forms an entity can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    /// Shaded sphere, shown close up and used for picking.
    Volumetric,
    /// Constant-size point, shown far away.
    Point,
    /// Selection highlight around the sphere.
    Outline,
}

impl Representation {
    pub const ALL: [Representation; 3] = [
        Representation::Volumetric,
        Representation::Point,
        Representation::Outline,
    ];
}

/// Visibility flag per [`Representation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepresentationVisibility {
    volumetric: bool,
    point: bool,
    outline: bool,
}

impl Default for RepresentationVisibility {
    fn default() -> Self {
        Self {
            volumetric: true,
            point: false,
            outline: false,
        }
    }
}

impl RepresentationVisibility {
    #[inline]
    pub fn get(&self, rep: Representation) -> bool {
        match rep {
            Representation::Volumetric => self.volumetric,
            Representation::Point => self.point,
            Representation::Outline => self.outline,
        }
    }

    #[inline]
    pub fn set(&mut self, rep: Representation, visible: bool) {
        match rep {
            Representation::Volumetric => self.volumetric = visible,
            Representation::Point => self.point = visible,
            Representation::Outline => self.outline = visible,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Sphere radius in scaled units.
    pub radius: f64,
    pub color: [f32; 3],
    position: DVec3,
    /// False when the dataset has no record for the current day.
    present: bool,
    representations: RepresentationVisibility,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, radius: f64, color: [f32; 3]) -> Self {
        Self {
            id,
            name: name.into(),
            radius,
            color,
            position: DVec3::ZERO,
            present: true,
            representations: RepresentationVisibility::default(),
        }
    }

    /// Scaled position. Keeps the last known value while the entity is absent.
    #[inline]
    pub fn position(&self) -> DVec3 {
        self.position
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Applies a resolved position; `None` hides the entity for the day.
    pub fn apply_position(&mut self, position: Option<DVec3>) {
        match position {
            Some(p) => {
                self.position = p;
                self.present = true;
            }
            None => self.present = false,
        }
    }

    #[inline]
    pub fn representations(&self) -> RepresentationVisibility {
        self.representations
    }

    #[inline]
    pub fn shows(&self, rep: Representation) -> bool {
        self.representations.get(rep)
    }

    /// Whether `rep` should actually be drawn this frame.
    #[inline]
    pub fn is_rendered(&self, rep: Representation) -> bool {
        self.present && self.representations.get(rep)
    }

    pub fn set_visible(&mut self, rep: Representation, visible: bool) {
        self.representations.set(rep, visible);
    }

    /// Selection status mirrors the outline highlight.
    #[inline]
    pub fn is_selected(&self) -> bool {
        self.representations.get(Representation::Outline)
    }
}

/// Owns every entity, addressable by id or by name.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
}

/// Fallback for bodies without a catalog color.
const DEFAULT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

impl EntityRegistry {
    /// Creates one entity per catalog body. Radii are converted to scaled units.
    pub fn from_catalog(catalog: &Catalog, default_radius: f64, scaling_factor: f64) -> Self {
        let mut registry = Self::default();
        for (name, props) in catalog.iter() {
            let radius = props.render_radius.unwrap_or(default_radius) / scaling_factor;
            let color = props.color_rgb().unwrap_or(DEFAULT_COLOR);
            registry.insert(name, radius, color);
        }
        registry
    }

    pub fn insert(&mut self, name: &str, radius: f64, color: [f32; 3]) -> EntityId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = EntityId(self.entities.len());
        self.entities.push(Entity::new(id, name, radius, color));
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.0)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Entity> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_builds_from_catalog() {
        let catalog = Catalog::from_json_str(
            r##"{ "Sun": { "render_radius": 2e7, "color": "#ff0000" }, "Earth": {} }"##,
        )
        .unwrap();
        let registry = EntityRegistry::from_catalog(&catalog, 1e7, 1e6);

        assert_eq!(registry.len(), 2);
        let sun = registry.by_name("Sun").unwrap();
        assert_eq!(sun.radius, 20.0);
        assert_eq!(sun.color, [1.0, 0.0, 0.0]);
        assert_eq!(registry.by_name("Earth").unwrap().radius, 10.0);
        assert_eq!(registry.id_of("Pluto"), None);
    }

    #[test]
    fn insert_is_idempotent_per_name() {
        let mut registry = EntityRegistry::default();
        let a = registry.insert("Mars", 1.0, DEFAULT_COLOR);
        let b = registry.insert("Mars", 2.0, DEFAULT_COLOR);

        assert_eq!(a, b);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn absent_entity_keeps_last_position_but_is_not_rendered() {
        let mut e = Entity::new(EntityId(0), "Venus", 1.0, DEFAULT_COLOR);
        e.apply_position(Some(DVec3::new(1.0, 2.0, 3.0)));
        e.apply_position(None);

        assert!(!e.is_present());
        assert_eq!(e.position(), DVec3::new(1.0, 2.0, 3.0));
        assert!(e.shows(Representation::Volumetric));
        assert!(!e.is_rendered(Representation::Volumetric));
    }

    #[test]
    fn new_entities_start_volumetric_without_outline() {
        let e = Entity::new(EntityId(0), "Moon", 1.0, DEFAULT_COLOR);

        assert!(e.shows(Representation::Volumetric));
        assert!(!e.shows(Representation::Point));
        assert!(!e.is_selected());
    }
}
