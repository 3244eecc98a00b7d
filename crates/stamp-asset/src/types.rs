//! Asset pipeline type definitions

use serde::{Deserialize, Serialize};
use stamp_core::{Result, StampError};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Extensions hashed when nothing else is configured
pub const DEFAULT_EXTENSIONS: &[&str] = &[".glsl", ".frag"];

/// Non-empty set of filename suffixes that make a file eligible for hashing.
///
/// Entries are normalized to start with a dot, so `glsl` and `.glsl` are the
/// same suffix. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    /// Build a set from suffixes, rejecting an empty list and blank entries
    pub fn new<I, S>(suffixes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for suffix in suffixes {
            let raw = suffix.as_ref().trim();
            let bare = raw.strip_prefix('.').unwrap_or(raw);
            if bare.is_empty() {
                return Err(StampError::InvalidExtension(raw.to_string()));
            }
            set.insert(format!(".{}", bare));
        }

        if set.is_empty() {
            return Err(StampError::InvalidExtension(String::new()));
        }
        Ok(Self(set))
    }

    /// Whether a file name ends with one of the suffixes.
    ///
    /// A dotfile named exactly like a suffix (`.glsl`) counts too.
    pub fn matches(&self, file_name: &str) -> bool {
        self.0.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self(DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect())
    }
}

impl TryFrom<Vec<String>> for ExtensionSet {
    type Error = StampError;

    fn try_from(v: Vec<String>) -> Result<Self> {
        Self::new(v)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// One logical -> physical mapping, both relative and `/`-separated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub logical: String,
    pub physical: String,
}

/// Inputs for one hashing run
#[derive(Debug, Clone)]
pub struct HashOptions {
    pub source_root: PathBuf,
    pub output_root: PathBuf,
    pub manifest_path: PathBuf,
    pub extensions: ExtensionSet,
    /// Carry the source modification time over to each copy
    pub preserve_mtime: bool,
}

impl HashOptions {
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
        extensions: ExtensionSet,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_root: output_root.into(),
            manifest_path: manifest_path.into(),
            extensions,
            preserve_mtime: true,
        }
    }
}
