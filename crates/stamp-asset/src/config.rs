//! Layered configuration system
//!
//! Config is loaded with three layers of precedence (highest wins):
//! 1. Environment variables: `STAMP_SOURCE_DIR`, `STAMP_OUTPUT_DIR`,
//!    `STAMP_MANIFEST`, `STAMP_EXTENSIONS` (comma-separated)
//! 2. Project-local: `stamp.toml`
//! 3. Global: `~/.stamp/config.toml`
//!
//! Command-line flags are applied on top by the caller.

use crate::types::{ExtensionSet, HashOptions, DEFAULT_EXTENSIONS};
use serde::{Deserialize, Serialize};
use stamp_core::{FsOp, Result, StampError};
use std::path::{Path, PathBuf};

/// Project-local config file name
pub const PROJECT_CONFIG: &str = "stamp.toml";

/// `[hash]` section as written in a config file; every field optional so
/// layers can be merged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HashSection {
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub manifest: Option<PathBuf>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
    #[serde(default)]
    pub preserve_mtime: Option<bool>,
}

/// Top-level config file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StampConfigFile {
    #[serde(default)]
    pub hash: HashSection,
}

/// Resolved configuration with defaults filled in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampConfig {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub manifest: PathBuf,
    pub extensions: Vec<String>,
    pub preserve_mtime: bool,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("shaders"),
            output_dir: PathBuf::from("build/shaders"),
            manifest: PathBuf::from("build/shader_manifest.json"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            preserve_mtime: true,
        }
    }
}

impl StampConfig {
    /// Load config with layered precedence: global < project < env vars
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Layer 1: Global config (~/.stamp/config.toml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config.merge(Self::load_file(&global_path)?.hash);
            }
        }

        // Layer 2: Project-local config (stamp.toml)
        let local_path = PathBuf::from(PROJECT_CONFIG);
        if local_path.exists() {
            config.merge(Self::load_file(&local_path)?.hash);
        }

        // Layer 3: Environment variable overrides
        config.apply_env_overrides();

        Ok(config)
    }

    /// Load an explicit config file on top of defaults, then env vars
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge(Self::load_file(path)?.hash);
        config.apply_env_overrides();
        Ok(config)
    }

    /// Validate the extension list and produce options for a hashing run
    pub fn hash_options(&self) -> Result<HashOptions> {
        let extensions = ExtensionSet::new(&self.extensions)?;
        let mut options = HashOptions::new(
            &self.source_dir,
            &self.output_dir,
            &self.manifest,
            extensions,
        );
        options.preserve_mtime = self.preserve_mtime;
        Ok(options)
    }

    /// Overlay every field the section sets
    pub fn merge(&mut self, section: HashSection) {
        if let Some(source_dir) = section.source_dir {
            self.source_dir = source_dir;
        }
        if let Some(output_dir) = section.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(manifest) = section.manifest {
            self.manifest = manifest;
        }
        if let Some(extensions) = section.extensions {
            self.extensions = extensions;
        }
        if let Some(preserve_mtime) = section.preserve_mtime {
            self.preserve_mtime = preserve_mtime;
        }
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".stamp").join("config.toml"))
    }

    fn load_file(path: &Path) -> Result<StampConfigFile> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StampError::fs(FsOp::Read, path, e))?;
        toml::from_str(&content).map_err(|e| {
            StampError::Config(format!("Failed to parse config {}: {}", path.display(), e))
        })
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        self.merge(HashSection {
            source_dir: var("STAMP_SOURCE_DIR").map(PathBuf::from),
            output_dir: var("STAMP_OUTPUT_DIR").map(PathBuf::from),
            manifest: var("STAMP_MANIFEST").map(PathBuf::from),
            extensions: var("STAMP_EXTENSIONS")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect()),
            preserve_mtime: None,
        });
    }
}
