//! Single-file fingerprint command

use anyhow::{Context, Result};
use stamp_core::Fingerprint;

pub fn run(files: &[String], full: bool) -> Result<()> {
    for file in files {
        let fingerprint = Fingerprint::from_file(file)
            .with_context(|| format!("Failed to read {}", file))?;
        let shown = if full {
            fingerprint.to_hex()
        } else {
            fingerprint.short()
        };
        println!("{}  {}", shown, file);
    }
    Ok(())
}
