//! CLI command implementations

pub mod fingerprint;
pub mod hash;
pub mod resolve;
pub mod verify;

use anyhow::{Context, Result};
use stamp_asset::StampConfig;
use std::path::Path;

/// Resolve configuration from an explicit file or the layered lookup
pub fn load_config(config: Option<&str>) -> Result<StampConfig> {
    match config {
        Some(path) => StampConfig::load_from_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path)),
        None => StampConfig::load().context("Failed to load config"),
    }
}
