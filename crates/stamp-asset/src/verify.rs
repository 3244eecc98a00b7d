//! Check an output tree against its manifest

use crate::manifest::Manifest;
use crate::naming::{logical_path, split_fingerprinted_name};
use serde::Serialize;
use stamp_core::{Fingerprint, FsOp, Result, StampError};
use std::collections::BTreeSet;
use std::path::{Component, Path};
use tracing::warn;
use walkdir::WalkDir;

/// A physical file whose content no longer matches the name it carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub logical: String,
    pub physical: String,
    pub expected: String,
    pub actual: String,
}

/// Outcome of [`verify_output`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerifyReport {
    /// Logical keys whose physical file is present and intact
    pub ok: Vec<String>,
    /// Logical keys whose physical file is absent
    pub missing: Vec<String>,
    pub mismatched: Vec<Mismatch>,
    /// Output files no manifest entry points at
    pub stray: Vec<String>,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.mismatched.is_empty() && self.stray.is_empty()
    }
}

/// Verify every manifest entry against the files under `output_root`.
///
/// An entry is intact when its physical file exists and the fingerprint in
/// its name matches the file's current content. A physical path that would
/// leave `output_root` (absolute, or with `..`) is reported missing and
/// never opened.
pub fn verify_output(output_root: &Path, manifest: &Manifest) -> Result<VerifyReport> {
    if !output_root.is_dir() {
        return Err(StampError::fs(
            FsOp::Read,
            output_root,
            std::io::Error::new(std::io::ErrorKind::NotFound, "output directory does not exist"),
        ));
    }

    let mut report = VerifyReport::default();
    let mut referenced = BTreeSet::new();

    for (logical, physical) in manifest.iter() {
        if !stays_inside(physical) {
            warn!(%logical, %physical, "physical path escapes the output directory");
            report.missing.push(logical.to_string());
            continue;
        }
        referenced.insert(physical.to_string());
        let path = output_root.join(physical);
        if !path.is_file() {
            warn!(%logical, %physical, "missing hashed file");
            report.missing.push(logical.to_string());
            continue;
        }

        let file_name = physical.rsplit('/').next().unwrap_or(physical);
        let expected = match split_fingerprinted_name(file_name) {
            Some((_, fp)) => fp.to_string(),
            None => String::new(),
        };
        let actual = Fingerprint::from_file(&path)
            .map_err(|e| StampError::fs(FsOp::Read, &path, e))?
            .short();

        if expected == actual {
            report.ok.push(logical.to_string());
        } else {
            warn!(%logical, %physical, %expected, %actual, "fingerprint mismatch");
            report.mismatched.push(Mismatch {
                logical: logical.to_string(),
                physical: physical.to_string(),
                expected,
                actual,
            });
        }
    }

    for entry in WalkDir::new(output_root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| output_root.to_path_buf());
            StampError::fs(FsOp::Walk, path, e.into())
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(output_root)
            .map_err(|_| StampError::Encoding(entry.path().to_path_buf()))?;
        let rel = logical_path(rel)?;
        if !referenced.contains(&rel) {
            warn!(path = %rel, "stray file in output");
            report.stray.push(rel);
        }
    }

    Ok(report)
}

/// Whether a manifest path names something strictly below the output root
fn stays_inside(physical: &str) -> bool {
    !physical.is_empty()
        && Path::new(physical)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}
