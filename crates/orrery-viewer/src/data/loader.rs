//! Reads the catalog and the position dataset from disk.

use anyhow::{Context, Result};
use orrery::{Catalog, PositionStore};
use std::{fs, path::Path, time::Instant};

pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading body catalog {}", path.display()))?;
    let catalog = Catalog::from_json_str(&text)
        .with_context(|| format!("parsing body catalog {}", path.display()))?;

    log::info!("Catalog: {} bodies from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn load_positions(path: &Path, scaling_factor: f64, central_body: &str) -> Result<PositionStore> {
    let started = Instant::now();
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading positions {}", path.display()))?;
    let store = PositionStore::from_json_str(&text, scaling_factor, central_body)
        .with_context(|| format!("parsing positions {}", path.display()))?;

    log::debug!(
        "Parsed {} ({} MiB) in {:.2?}",
        path.display(),
        text.len() / (1024 * 1024),
        started.elapsed()
    );
    Ok(store)
}
