//! Content-addressed rewriting of a source tree
//!
//! A run wipes the output directory, walks the source tree, copies every
//! eligible file under a fingerprinted name into the mirrored output
//! directory, and writes a manifest from logical to physical paths. Every
//! run is a full rebuild.

use crate::manifest::Manifest;
use crate::naming::{fingerprinted_name, logical_path};
use crate::store::OutputStore;
use crate::types::{ExtensionSet, HashOptions};
use stamp_core::{FsOp, Result, StampError};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};
use walkdir::WalkDir;

/// Hash `source_root` into `output_root` and write the manifest.
///
/// `output_root` is deleted first if it exists. The returned manifest is the
/// one written to `manifest_path`.
pub fn hash_directory(
    source_root: impl AsRef<Path>,
    output_root: impl AsRef<Path>,
    manifest_path: impl AsRef<Path>,
    extensions: &ExtensionSet,
) -> Result<Manifest> {
    let options = HashOptions::new(
        source_root.as_ref(),
        output_root.as_ref(),
        manifest_path.as_ref(),
        extensions.clone(),
    );
    AssetHasher::new(options).run()
}

/// Single-run content-addressed asset rewriter
pub struct AssetHasher {
    options: HashOptions,
}

impl AssetHasher {
    pub fn new(options: HashOptions) -> Self {
        Self { options }
    }

    /// Rebuild the output tree and write the manifest
    pub fn run(&self) -> Result<Manifest> {
        let manifest = self.build()?;
        manifest.save(&self.options.manifest_path)?;
        info!(
            files = manifest.len(),
            manifest = %self.options.manifest_path.display(),
            "wrote manifest"
        );
        Ok(manifest)
    }

    /// Rebuild the output tree and return the manifest without writing it
    pub fn build(&self) -> Result<Manifest> {
        let source = &self.options.source_root;
        if !source.is_dir() {
            return Err(StampError::SourceNotFound(source.clone()));
        }
        // An unreadable source must fail here, before the output is wiped
        if let Err(e) = std::fs::read_dir(source) {
            debug!(source = %source.display(), error = %e, "source not readable");
            return Err(StampError::SourceNotFound(source.clone()));
        }
        check_roots_disjoint(source, &self.options.output_root)?;

        let store = OutputStore::new(&self.options.output_root);
        store.reset()?;

        let mut manifest = Manifest::new();
        for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| source.clone());
                StampError::fs(FsOp::Walk, path, e.into())
            })?;
            let path = entry.path();
            let rel = path
                .strip_prefix(source)
                .map_err(|_| StampError::Encoding(path.to_path_buf()))?;

            if entry.file_type().is_dir() {
                store.ensure_dir(rel)?;
                continue;
            }
            // Symlinks to files count, symlinked directories are not entered
            if !path.is_file() {
                trace!(path = %path.display(), "skipping non-file entry");
                continue;
            }
            if !self.options.extensions.matches(&entry.file_name().to_string_lossy()) {
                trace!(path = %path.display(), "skipping ineligible file");
                continue;
            }

            let (logical, physical) = self.hash_file(&store, path, rel)?;
            debug!(%logical, %physical, "hashed");
            manifest.insert(logical, physical);
        }

        info!(
            files = manifest.len(),
            source = %source.display(),
            output = %self.options.output_root.display(),
            "hashed asset tree"
        );
        Ok(manifest)
    }

    fn hash_file(&self, store: &OutputStore, path: &Path, rel: &Path) -> Result<(String, String)> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StampError::Encoding(path.to_path_buf()))?;
        let rel_dir = rel.parent().unwrap_or_else(|| Path::new(""));
        let logical = logical_path(rel)?;
        let physical_dir = logical_path(rel_dir)?;

        let stored = store.copy_in(
            path,
            rel_dir,
            |fingerprint| fingerprinted_name(file_name, fingerprint),
            self.options.preserve_mtime,
        )?;

        let physical = match physical_dir {
            dir if dir.is_empty() => stored.name,
            dir => format!("{}/{}", dir, stored.name),
        };
        Ok((logical, physical))
    }
}

/// Refuse to run when deleting the output would touch the source, or the
/// walk would see the output.
fn check_roots_disjoint(source: &Path, output: &Path) -> Result<()> {
    let source_abs = resolve_path(source);
    let output_abs = resolve_path(output);
    if output_abs.starts_with(&source_abs) || source_abs.starts_with(&output_abs) {
        return Err(StampError::OverlappingRoots {
            source_dir: source.to_path_buf(),
            output: output.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonicalize the longest existing prefix of `path` and re-attach the rest
fn resolve_path(path: &Path) -> PathBuf {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = abs.as_path();
    let mut tail = Vec::new();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return tail.iter().rev().fold(canonical, |acc, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                tail.push(name.to_os_string());
                existing = parent;
            }
            _ => return abs,
        }
    }
}
