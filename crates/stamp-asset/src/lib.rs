//! Stamp Asset - Content-addressed asset rewriting
//!
//! This crate copies a tree of source assets to an output tree under
//! fingerprinted names (`<stem>.<fp>.<ext>`) and records a manifest from
//! each logical path to its physical path.

pub mod config;
mod hasher;
mod manifest;
pub mod naming;
mod store;
mod types;
mod verify;

pub use config::StampConfig;
pub use hasher::{hash_directory, AssetHasher};
pub use manifest::Manifest;
pub use store::{atomic_write, OutputStore, StoredFile};
pub use types::{ExtensionSet, HashOptions, ManifestEntry, DEFAULT_EXTENSIONS};
pub use verify::{verify_output, Mismatch, VerifyReport};
