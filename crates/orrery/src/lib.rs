//! Orrery: time navigation and proximity-driven representation for a
//! precomputed solar-system ephemeris.
//!
//! - [`dates`] maps slider positions to a fixed 5-day calendar grid.
//! - [`positions`] resolves (body, day) to scaled scene coordinates.
//! - [`representation`] switches bodies between sphere and point by camera distance.
//! - [`playback`] advances the date on a fixed cadence with synchronous cancellation.
//! - [`selection`] measures the distance between two picked bodies.
//! - [`engine`] ties them together behind one controller, [`Orrery`].
//!
//! The crate performs no I/O; callers hand it JSON text and UI events.

pub mod catalog;
pub mod dates;
pub mod engine;
pub mod entity;
pub mod error;
pub mod playback;
pub mod positions;
pub mod representation;
pub mod scene;
pub mod selection;

pub use catalog::{BodyProperties, Catalog};
pub use dates::{day_key, DateIndex, DateIndexTable, STRIDE_DAYS};
pub use engine::{DateChanged, Orrery, OrreryConfig};
pub use entity::{Entity, EntityId, EntityRegistry, Representation};
pub use error::{OrreryError, Result};
pub use playback::{PlaybackPhase, PlaybackScheduler, PlaybackState, Tick};
pub use positions::PositionStore;
pub use representation::RepresentationSwitch;
pub use scene::{ObjectHandle, Ray, Scene, SceneObject};
pub use selection::{Measurement, PickOutcome, SelectionMeasurer, SelectionSet, SelectionState};
