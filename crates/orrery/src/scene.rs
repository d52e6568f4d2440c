//! The narrow scene seam the core draws transient objects through, plus the
//! pick ray type.

use glam::DVec3;

/// Opaque handle returned by [`Scene::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Transient objects the core places in the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneObject {
    /// Straight segment between two scaled positions.
    Line { from: DVec3, to: DVec3 },
    /// Billboard text anchored at a scaled position.
    Label {
        text: String,
        anchor: DVec3,
        /// World-space scale of the billboard.
        scale: f64,
    },
}

/// Implemented by the renderer side. Removing an unknown handle is a no-op.
pub trait Scene {
    fn add(&mut self, object: SceneObject) -> ObjectHandle;
    fn remove(&mut self, handle: ObjectHandle);
}

/// Half-line in scaled scene units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit length.
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Ray from `origin` through `target`.
    pub fn through(origin: DVec3, target: DVec3) -> Self {
        Self::new(origin, target - origin)
    }

    /// Distance along the ray to the first intersection with a sphere, if any.
    /// A ray starting inside the sphere hits it at distance 0.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let t = -b - disc.sqrt();
        (t >= 0.0).then_some(t)
    }
}

/// In-memory [`Scene`] that records what the core adds and removes.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Default)]
    pub struct RecordingScene {
        next: u64,
        pub live: BTreeMap<ObjectHandle, SceneObject>,
        pub added: usize,
        pub removed: usize,
    }

    impl RecordingScene {
        pub fn lines(&self) -> Vec<(DVec3, DVec3)> {
            self.live
                .values()
                .filter_map(|o| match o {
                    SceneObject::Line { from, to } => Some((*from, *to)),
                    _ => None,
                })
                .collect()
        }

        pub fn labels(&self) -> Vec<String> {
            self.live
                .values()
                .filter_map(|o| match o {
                    SceneObject::Label { text, .. } => Some(text.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl Scene for RecordingScene {
        fn add(&mut self, object: SceneObject) -> ObjectHandle {
            let handle = ObjectHandle(self.next);
            self.next += 1;
            self.added += 1;
            self.live.insert(handle, object);
            handle
        }

        fn remove(&mut self, handle: ObjectHandle) {
            if self.live.remove(&handle).is_some() {
                self.removed += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_sphere_in_front() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -2.0));
        let t = ray.intersect_sphere(DVec3::new(0.0, 0.0, -10.0), 1.0).unwrap();
        assert!((t - 9.0).abs() < 1e-12);
    }

    #[test]
    fn misses_sphere_behind_or_aside() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(ray.intersect_sphere(DVec3::new(-5.0, 0.0, 0.0), 1.0), None);
        assert_eq!(ray.intersect_sphere(DVec3::new(5.0, 3.0, 0.0), 1.0), None);
    }

    #[test]
    fn origin_inside_sphere_hits_at_zero() {
        let ray = Ray::through(DVec3::ZERO, DVec3::Y);
        assert_eq!(ray.intersect_sphere(DVec3::new(0.0, 0.5, 0.0), 1.0), Some(0.0));
    }
}
