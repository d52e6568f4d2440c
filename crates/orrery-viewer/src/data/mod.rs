// src/data/mod.rs
//! Data handling for the viewer.
//!
//! - Loading the body catalog and the position dataset from disk.
//! - The data structures uploaded to GPU buffers.

pub mod loader;
pub mod types;

// Re-export commonly used types for convenience.
pub use self::types::{BodyInstance, CameraUniform, LineVertex};
