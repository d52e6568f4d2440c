//! Error types for the orrery core.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the orrery core.
///
/// Missing position data is never an error; see [`crate::PositionStore::resolve`].
#[derive(Debug, Error)]
pub enum OrreryError {
    /// A date index outside `[0, count)` reached the core.
    #[error("date index {index} out of range (count = {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// The fixed date range produced no stride dates.
    #[error("date range {start}..={end} contains no stride dates")]
    EmptyDateRange { start: NaiveDate, end: NaiveDate },

    /// Step size outside `[5, 100]` days or not a multiple of the stride.
    #[error("invalid playback step size: {0} days")]
    InvalidStepSize(u32),

    /// A dataset key that is not an ISO `YYYY-MM-DD` day.
    #[error("invalid day key in dataset: {0:?}")]
    InvalidDayKey(String),

    /// Catalog or dataset JSON failed to parse.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrreryError>;
