//! Lookup manifest mapping logical paths to fingerprinted paths
//!
//! Serialized as a flat, pretty-printed JSON object sorted by logical key:
//!
//! ```json
//! {
//!   "common/utils.glsl": "common/utils.7b44e210.glsl",
//!   "post/tonemap.frag": "post/tonemap.9f2a1c3d.frag"
//! }
//! ```

use crate::naming::normalize_key;
use crate::store::atomic_write;
use crate::types::ManifestEntry;
use serde::{Deserialize, Serialize};
use stamp_core::{FsOp, Result, StampError};
use std::collections::BTreeMap;
use std::path::Path;

/// Logical -> physical mapping produced by one hashing run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Create a new empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mapping, returning the physical path it replaced if any
    pub fn insert(
        &mut self,
        logical: impl Into<String>,
        physical: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(logical.into(), physical.into())
    }

    /// Look up a logical key exactly as stored
    pub fn get(&self, logical: &str) -> Option<&str> {
        self.entries.get(logical).map(|s| s.as_str())
    }

    /// Look up a user-supplied path, tolerating `./` and `\` separators
    pub fn resolve(&self, logical: &str) -> Option<&str> {
        self.get(&normalize_key(logical))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate (logical, physical) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn entries(&self) -> Vec<ManifestEntry> {
        self.entries
            .iter()
            .map(|(logical, physical)| ManifestEntry {
                logical: logical.clone(),
                physical: physical.clone(),
            })
            .collect()
    }

    /// Pretty JSON with 2-space indent and a trailing newline
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StampError::ManifestSerialize(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Save manifest to file, replacing whatever was there
    pub fn save(&self, path: &Path) -> Result<()> {
        atomic_write(path, self.to_json_pretty()?.as_bytes())
    }

    /// Load manifest from file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StampError::fs(FsOp::Read, path, e))?;
        serde_json::from_str(&content).map_err(|e| StampError::ManifestParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
