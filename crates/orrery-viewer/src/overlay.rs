//! Renderer-side store for the transient lines and labels the core places.

use glam::DVec3;
use orrery::{ObjectHandle, Scene, SceneObject};
use std::collections::BTreeMap;

/// Text billboard waiting to be drawn by the HUD.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLabel {
    pub text: String,
    pub anchor: DVec3,
    pub scale: f64,
}

#[derive(Debug, Default)]
pub struct Overlay {
    next: u64,
    objects: BTreeMap<ObjectHandle, SceneObject>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = (DVec3, DVec3)> + '_ {
        self.objects.values().filter_map(|object| match object {
            SceneObject::Line { from, to } => Some((*from, *to)),
            SceneObject::Label { .. } => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = OverlayLabel> + '_ {
        self.objects.values().filter_map(|object| match object {
            SceneObject::Label {
                text,
                anchor,
                scale,
            } => Some(OverlayLabel {
                text: text.clone(),
                anchor: *anchor,
                scale: *scale,
            }),
            SceneObject::Line { .. } => None,
        })
    }
}

impl Scene for Overlay {
    fn add(&mut self, object: SceneObject) -> ObjectHandle {
        self.next += 1;
        let handle = ObjectHandle(self.next);
        self.objects.insert(handle, object);
        handle
    }

    fn remove(&mut self, handle: ObjectHandle) {
        self.objects.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique_and_removal_is_idempotent() {
        let mut overlay = Overlay::new();
        let a = overlay.add(SceneObject::Line {
            from: DVec3::ZERO,
            to: DVec3::X,
        });
        let b = overlay.add(SceneObject::Label {
            text: "1.00 Million km".into(),
            anchor: DVec3::Y,
            scale: 4.0,
        });
        assert_ne!(a, b);
        assert_eq!(overlay.len(), 2);

        overlay.remove(a);
        overlay.remove(a);
        assert_eq!(overlay.lines().count(), 0);
        assert_eq!(overlay.labels().count(), 1);

        let c = overlay.add(SceneObject::Line {
            from: DVec3::ZERO,
            to: DVec3::Z,
        });
        assert!(c != a && c != b);
    }

    #[test]
    fn splits_objects_by_kind() {
        let mut overlay = Overlay::new();
        overlay.add(SceneObject::Line {
            from: DVec3::ZERO,
            to: DVec3::X,
        });
        overlay.add(SceneObject::Label {
            text: "x".into(),
            anchor: DVec3::ZERO,
            scale: 9.0,
        });

        assert_eq!(overlay.lines().collect::<Vec<_>>(), vec![(DVec3::ZERO, DVec3::X)]);
        assert_eq!(overlay.labels().next().map(|l| l.scale), Some(9.0));
    }
}
