//! Stamp Core - Foundational types for stamp
//!
//! This crate provides the types the other stamp crates depend on:
//! - `Fingerprint` - SHA-256 content fingerprints
//! - Error types and Result alias

mod error;
mod fingerprint;

pub use error::{FsOp, Result, StampError};
pub use fingerprint::{Fingerprint, SHORT_LEN};
