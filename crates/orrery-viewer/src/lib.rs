//! Desktop viewer for the orrery core.
//!
//! Renders the bodies with wgpu, forwards input and egui widgets to an
//! [`orrery::Orrery`], and draws the transient measurement overlay.

pub mod app;
pub mod camera;
pub mod config;
pub mod data;
pub mod overlay;
pub mod renderer;
pub mod ui;
