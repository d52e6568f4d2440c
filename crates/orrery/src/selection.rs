//! Two-body selection and distance measurement.
//!
//! Picks drive a small state machine over at most two entities. While two are
//! selected, a line and a distance label connect them; both are rebuilt from
//! live positions every frame so they follow the bodies during playback.

use crate::entity::{EntityId, EntityRegistry, Representation};
use crate::scene::{ObjectHandle, Ray, Scene, SceneObject};
use glam::DVec3;

/// Upward (+Y) lift of the label above the segment midpoint, in scaled units.
pub const LABEL_LIFT: f64 = 5.0;
/// Smallest label scale; keeps short distances legible.
pub const MIN_LABEL_SCALE: f64 = 4.0;

/// Label scale grows with the square of the distance.
#[inline]
pub fn label_scale(distance: f64) -> f64 {
    (distance * distance / 100.0).max(MIN_LABEL_SCALE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Empty,
    OneSelected(EntityId),
    TwoSelected(EntityId, EntityId),
}

/// Ordered selection of at most two entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<EntityId>,
}

impl SelectionSet {
    pub const CAPACITY: usize = 2;

    pub fn as_slice(&self) -> &[EntityId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn state(&self) -> SelectionState {
        match *self.ids.as_slice() {
            [] => SelectionState::Empty,
            [a] => SelectionState::OneSelected(a),
            [a, b] => SelectionState::TwoSelected(a, b),
            _ => unreachable!("selection holds at most two entities"),
        }
    }

    pub fn pair(&self) -> Option<(EntityId, EntityId)> {
        match self.state() {
            SelectionState::TwoSelected(a, b) => Some((a, b)),
            _ => None,
        }
    }

    fn push(&mut self, id: EntityId) {
        debug_assert!(self.ids.len() < Self::CAPACITY);
        self.ids.push(id);
    }

    fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Distance between two positions and where its label goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Exact Euclidean distance in scaled units.
    pub distance: f64,
    pub from: DVec3,
    pub to: DVec3,
    pub anchor: DVec3,
    pub label_scale: f64,
}

impl Measurement {
    pub fn between(from: DVec3, to: DVec3) -> Self {
        let distance = from.distance(to);
        Self {
            distance,
            from,
            to,
            anchor: (from + to) / 2.0 + DVec3::Y * LABEL_LIFT,
            label_scale: label_scale(distance),
        }
    }

    /// User-facing text, rounded to two decimals.
    pub fn label_text(&self, unit: &str) -> String {
        format!("{:.2} {}", self.distance, unit)
    }
}

/// Result of a pointer click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickOutcome {
    /// Selection mode is off.
    Ignored,
    /// The ray hit no sphere.
    Missed,
    Picked(SelectionState),
}

#[derive(Debug)]
struct Artifact {
    line: ObjectHandle,
    label: ObjectHandle,
    measurement: Measurement,
}

/// Nearest entity sphere hit by `ray`. Only entities with data for the current
/// day take part; points are never pickable.
pub fn nearest_hit(ray: &Ray, registry: &EntityRegistry) -> Option<EntityId> {
    registry
        .iter()
        .filter(|e| e.is_present())
        .filter_map(|e| ray.intersect_sphere(e.position(), e.radius).map(|t| (t, e.id)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, id)| id)
}

#[derive(Debug)]
pub struct SelectionMeasurer {
    active: bool,
    selection: SelectionSet,
    artifact: Option<Artifact>,
    unit: String,
}

impl SelectionMeasurer {
    /// `unit` is appended to the distance label, e.g. `"Million km"`.
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            active: false,
            selection: SelectionSet::default(),
            artifact: None,
            unit: unit.into(),
        }
    }

    /// Whether clicks are interpreted as picks.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Current measurement; `None` unless exactly two entities are selected.
    pub fn measurement(&self) -> Option<&Measurement> {
        self.artifact.as_ref().map(|a| &a.measurement)
    }

    pub fn distance(&self) -> Option<f64> {
        self.measurement().map(|m| m.distance)
    }

    pub fn has_artifact(&self) -> bool {
        self.artifact.is_some()
    }

    /// Flips selection mode. Either way the selection, outlines and
    /// measurement artifacts are cleared.
    pub fn toggle_mode(&mut self, registry: &mut EntityRegistry, scene: &mut dyn Scene) -> bool {
        self.active = !self.active;
        self.clear(registry, scene);
        log::debug!("Selection mode {}", if self.active { "on" } else { "off" });
        self.active
    }

    /// Handles a pointer click already turned into a ray.
    pub fn pick(
        &mut self,
        ray: &Ray,
        registry: &mut EntityRegistry,
        scene: &mut dyn Scene,
    ) -> PickOutcome {
        if !self.active {
            return PickOutcome::Ignored;
        }
        match nearest_hit(ray, registry) {
            Some(id) => PickOutcome::Picked(self.select(id, registry, scene)),
            None => PickOutcome::Missed,
        }
    }

    /// Advances the state machine with `id` as the picked entity.
    pub fn select(
        &mut self,
        id: EntityId,
        registry: &mut EntityRegistry,
        scene: &mut dyn Scene,
    ) -> SelectionState {
        match self.selection.state() {
            SelectionState::Empty => self.add(id, registry),
            SelectionState::OneSelected(a) if a == id => self.clear(registry, scene),
            SelectionState::OneSelected(_) => {
                self.add(id, registry);
                self.rebuild(registry, scene);
            }
            SelectionState::TwoSelected(a, b) if a == id || b == id => {
                self.clear(registry, scene)
            }
            SelectionState::TwoSelected(..) => {
                self.clear(registry, scene);
                self.add(id, registry);
            }
        }

        let state = self.selection.state();
        log::debug!("Selection -> {:?}", state);
        state
    }

    /// Per-frame refresh. Does nothing unless two entities are selected.
    pub fn update(&mut self, registry: &EntityRegistry, scene: &mut dyn Scene) {
        if self.selection.pair().is_some() {
            self.rebuild(registry, scene);
        }
    }

    /// Replaces the line every call and the label whenever the measurement
    /// changed.
    fn rebuild(&mut self, registry: &EntityRegistry, scene: &mut dyn Scene) {
        let Some((a, b)) = self.selection.pair() else {
            return;
        };
        let (Some(a), Some(b)) = (registry.get(a), registry.get(b)) else {
            return;
        };

        let measurement = Measurement::between(a.position(), b.position());
        let previous = self.artifact.take();

        let label = match previous {
            Some(old) => {
                scene.remove(old.line);
                if old.measurement == measurement {
                    Some(old.label)
                } else {
                    scene.remove(old.label);
                    None
                }
            }
            None => None,
        };

        let line = scene.add(SceneObject::Line {
            from: measurement.from,
            to: measurement.to,
        });
        let label = label.unwrap_or_else(|| {
            scene.add(SceneObject::Label {
                text: measurement.label_text(&self.unit),
                anchor: measurement.anchor,
                scale: measurement.label_scale,
            })
        });

        self.artifact = Some(Artifact {
            line,
            label,
            measurement,
        });
    }

    fn add(&mut self, id: EntityId, registry: &mut EntityRegistry) {
        self.selection.push(id);
        if let Some(entity) = registry.get_mut(id) {
            entity.set_visible(Representation::Outline, true);
        }
    }

    fn clear(&mut self, registry: &mut EntityRegistry, scene: &mut dyn Scene) {
        self.selection.clear();
        for entity in registry.iter_mut() {
            entity.set_visible(Representation::Outline, false);
        }
        if let Some(artifact) = self.artifact.take() {
            scene.remove(artifact.line);
            scene.remove(artifact.label);
        }
    }
}
