//! The controller that owns all mutable viewer state.
//!
//! UI code never touches entities, the playback state or the selection
//! directly; it forwards events to an [`Orrery`] and reads back labels and
//! transforms.

use crate::catalog::Catalog;
use crate::dates::{day_key, DateIndex, DateIndexTable, FIRST_DAY, LAST_DAY};
use crate::entity::EntityRegistry;
use crate::error::Result;
use crate::playback::{PlaybackScheduler, Tick, DEFAULT_PERIOD};
use crate::positions::PositionStore;
use crate::representation::RepresentationSwitch;
use crate::scene::{Ray, Scene};
use crate::selection::{PickOutcome, SelectionMeasurer};
use chrono::NaiveDate;
use glam::DVec3;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct OrreryConfig {
    pub first_day: String,
    pub last_day: String,
    /// Dataset units per scene unit.
    pub scaling_factor: f64,
    /// Camera distance (dataset units) where spheres turn into points.
    pub visibility_distance: f64,
    /// Body pinned to the origin and never looked up.
    pub central_body: String,
    pub playback_period: Duration,
    /// Render radius (dataset units) for bodies the catalog gives none.
    pub default_render_radius: f64,
    /// Unit of the scaled distance shown to the user.
    pub distance_unit: String,
}

impl Default for OrreryConfig {
    fn default() -> Self {
        Self {
            first_day: FIRST_DAY.to_owned(),
            last_day: LAST_DAY.to_owned(),
            scaling_factor: 1e6,
            visibility_distance: 5e9,
            central_body: "Sun".to_owned(),
            playback_period: DEFAULT_PERIOD,
            default_render_radius: 1e7,
            distance_unit: "Million km".to_owned(),
        }
    }
}

/// Emitted whenever the active date changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateChanged {
    pub index: DateIndex,
    pub date: NaiveDate,
    pub label: String,
}

pub struct Orrery {
    dates: DateIndexTable,
    positions: PositionStore,
    registry: EntityRegistry,
    lod: RepresentationSwitch,
    playback: PlaybackScheduler,
    selection: SelectionMeasurer,
    date_label: String,
}

impl Orrery {
    /// Builds every entity and places them at the grid date closest to
    /// `initial_date`.
    pub fn new(
        config: &OrreryConfig,
        catalog: &Catalog,
        positions: PositionStore,
        initial_date: NaiveDate,
    ) -> Result<Self> {
        let dates = DateIndexTable::from_day_keys(&config.first_day, &config.last_day)?;
        let registry = EntityRegistry::from_catalog(
            catalog,
            config.default_render_radius,
            config.scaling_factor,
        );

        if !catalog.contains(&config.central_body) {
            log::warn!("Central body {:?} is not in the catalog", config.central_body);
        }
        for name in positions.entity_names() {
            if !catalog.contains(name) {
                log::warn!("Dataset body {:?} is not in the catalog and will not be shown", name);
            }
        }

        let start = dates.date_to_closest_index(initial_date);
        if dates.exact_index(initial_date).is_none() {
            log::debug!(
                "Initial date {} is off the stride grid; snapped to index {}",
                day_key(initial_date),
                start
            );
        }

        let mut orrery = Self {
            dates,
            positions,
            registry,
            lod: RepresentationSwitch::new(config.visibility_distance, config.scaling_factor),
            playback: PlaybackScheduler::new(config.playback_period, start),
            selection: SelectionMeasurer::new(config.distance_unit.clone()),
            date_label: String::new(),
        };
        orrery.apply_index(start)?;
        Ok(orrery)
    }

    pub fn dates(&self) -> &DateIndexTable {
        &self.dates
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn playback(&self) -> &PlaybackScheduler {
        &self.playback
    }

    pub fn selection(&self) -> &SelectionMeasurer {
        &self.selection
    }

    pub fn lod(&self) -> &RepresentationSwitch {
        &self.lod
    }

    /// ISO label of the active date.
    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn current_index(&self) -> DateIndex {
        self.playback.current_index()
    }

    pub fn current_date(&self) -> Result<NaiveDate> {
        self.dates.index_to_date(self.current_index())
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    /// Slider drag. `index` must already be clamped to the slider range.
    pub fn set_date_index(&mut self, index: DateIndex) -> Result<DateChanged> {
        self.apply_index(index)
    }

    /// Play/pause. Returns the new "is playing" status.
    pub fn toggle_playback(&mut self, now: Instant) -> bool {
        self.playback.toggle(now)
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn set_step_size(&mut self, days: u32) -> Result<()> {
        self.playback.set_step_size(days)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.playback.next_deadline()
    }

    /// Polls the playback timer and applies a due advance.
    pub fn tick(&mut self, now: Instant) -> Result<Option<DateChanged>> {
        match self.playback.poll(now, self.dates.last_index()) {
            Some(Tick::Advanced(index)) => self.apply_index(index).map(Some),
            Some(Tick::Finished) | None => Ok(None),
        }
    }

    /// Per-frame work: level of detail for every entity, then the measurement.
    pub fn frame(&mut self, camera: DVec3, scene: &mut dyn Scene) {
        for entity in self.registry.iter_mut() {
            self.lod.update(entity, camera);
        }
        self.selection.update(&self.registry, scene);
    }

    pub fn toggle_selection_mode(&mut self, scene: &mut dyn Scene) -> bool {
        self.selection.toggle_mode(&mut self.registry, scene)
    }

    pub fn pick(&mut self, ray: &Ray, scene: &mut dyn Scene) -> PickOutcome {
        self.selection.pick(ray, &mut self.registry, scene)
    }

    pub fn measured_distance(&self) -> Option<f64> {
        self.selection.distance()
    }

    /// Text for the distance panel; zero when nothing is measured.
    pub fn distance_readout(&self) -> String {
        format!(
            "Distance: {:.2} {}",
            self.measured_distance().unwrap_or(0.0),
            self.selection.unit()
        )
    }

    /// Moves every view of the current date to `index` in one step: slider
    /// index, positions and label. The index is validated before anything
    /// changes.
    fn apply_index(&mut self, index: DateIndex) -> Result<DateChanged> {
        let date = self.dates.index_to_date(index)?;
        let key = day_key(date);

        for entity in self.registry.iter_mut() {
            let position = self.positions.resolve_key(&entity.name, &key);
            entity.apply_position(position);
        }
        self.playback.seek(index);
        self.date_label = key;

        log::debug!("Date -> {} (index {})", self.date_label, index);

        Ok(DateChanged {
            index,
            date,
            label: self.date_label.clone(),
        })
    }
}
