//! Precomputed per-day body positions.
//!
//! The dataset maps an ISO day key to the positions of every body with data
//! on that day:
//!
//! ```json
//! { "2024-01-02": { "Earth": [x, y, z], "Mars": [x, y, z] } }
//! ```
//!
//! Coordinates are stored in km and divided by the scaling factor on the way
//! out, so everything downstream (LOD thresholds, measured distances) works in
//! scaled units.

use crate::dates::{day_key, parse_day_key};
use crate::error::Result;
use chrono::NaiveDate;
use glam::DVec3;
use std::collections::{BTreeMap, HashMap};

type DayPositions = HashMap<String, [f64; 3]>;

#[derive(Debug, Clone)]
pub struct PositionStore {
    /// ISO day keys sort chronologically, so iteration order is time order.
    days: BTreeMap<String, DayPositions>,
    scaling_factor: f64,
    central_body: String,
}

impl PositionStore {
    pub fn new(
        days: BTreeMap<String, DayPositions>,
        scaling_factor: f64,
        central_body: impl Into<String>,
    ) -> Result<Self> {
        for key in days.keys() {
            parse_day_key(key)?;
        }

        Ok(Self {
            days,
            scaling_factor,
            central_body: central_body.into(),
        })
    }

    pub fn from_json_str(
        json: &str,
        scaling_factor: f64,
        central_body: impl Into<String>,
    ) -> Result<Self> {
        let days: BTreeMap<String, DayPositions> = serde_json::from_str(json)?;
        let store = Self::new(days, scaling_factor, central_body)?;

        log::info!(
            "Loaded positions for {} days ({} .. {})",
            store.days.len(),
            store.days.keys().next().map_or("-", String::as_str),
            store.days.keys().next_back().map_or("-", String::as_str),
        );

        Ok(store)
    }

    #[inline]
    pub fn scaling_factor(&self) -> f64 {
        self.scaling_factor
    }

    pub fn central_body(&self) -> &str {
        &self.central_body
    }

    #[inline]
    pub fn is_central(&self, entity: &str) -> bool {
        entity == self.central_body
    }

    /// Number of days with at least one record.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Scaled position of `entity` on `date`, or `None` when the dataset has no
    /// record. The central body always sits at the origin.
    pub fn resolve(&self, entity: &str, date: NaiveDate) -> Option<DVec3> {
        if self.is_central(entity) {
            return Some(DVec3::ZERO);
        }
        self.resolve_key(entity, &day_key(date))
    }

    /// Same as [`Self::resolve`] for a pre-formatted day key.
    pub fn resolve_key(&self, entity: &str, key: &str) -> Option<DVec3> {
        if self.is_central(entity) {
            return Some(DVec3::ZERO);
        }
        self.days
            .get(key)
            .and_then(|day| day.get(entity))
            .map(|xyz| DVec3::from_array(*xyz) / self.scaling_factor)
    }

    /// All scaled positions of `entity` in day order, skipping days without data.
    /// Used to draw orbit paths.
    pub fn trajectory(&self, entity: &str) -> Vec<DVec3> {
        if self.is_central(entity) {
            return Vec::new();
        }
        self.days
            .values()
            .filter_map(|day| day.get(entity))
            .map(|xyz| DVec3::from_array(*xyz) / self.scaling_factor)
            .collect()
    }

    /// Names of every body that appears in the dataset.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .days
            .values()
            .flat_map(|day| day.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
