//! Error types for stamp

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Filesystem operation that failed, carried by [`StampError::Filesystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Remove,
    CreateDir,
    Read,
    Copy,
    Write,
    Rename,
    Walk,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsOp::Remove => "remove",
            FsOp::CreateDir => "create directory",
            FsOp::Read => "read",
            FsOp::Copy => "copy",
            FsOp::Write => "write",
            FsOp::Rename => "rename",
            FsOp::Walk => "walk",
        };
        f.write_str(s)
    }
}

/// The main error type for stamp operations
#[derive(Debug, Error)]
pub enum StampError {
    #[error("Source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error(
        "Output directory {} overlaps source directory {}",
        .output.display(),
        .source_dir.display()
    )]
    OverlappingRoots {
        source_dir: PathBuf,
        output: PathBuf,
    },

    #[error("Failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: FsOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is not valid UTF-8: {}", .0.display())]
    Encoding(PathBuf),

    #[error("Invalid extension: {0:?}")]
    InvalidExtension(String),

    #[error("Failed to parse manifest {}: {reason}", .path.display())]
    ManifestParse { path: PathBuf, reason: String },

    #[error("Failed to serialize manifest: {0}")]
    ManifestSerialize(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl StampError {
    /// Wrap an I/O error with the operation and path it happened on
    pub fn fs(op: FsOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StampError::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for stamp operations
pub type Result<T> = std::result::Result<T, StampError>;
