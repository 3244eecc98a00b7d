//! Manifest lookup command

use super::load_config;
use anyhow::{Context, Result};
use stamp_asset::Manifest;
use std::path::PathBuf;

pub fn run(logical: &str, manifest: Option<&str>, config: Option<&str>) -> Result<()> {
    let manifest_path = match manifest {
        Some(path) => PathBuf::from(path),
        None => load_config(config)?.manifest,
    };

    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;

    match manifest.resolve(logical) {
        Some(physical) => {
            println!("{}", physical);
            Ok(())
        }
        None => anyhow::bail!(
            "'{}' is not in {}",
            logical,
            manifest_path.display()
        ),
    }
}
