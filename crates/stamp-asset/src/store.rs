//! Output tree storage for fingerprinted copies

use stamp_core::{Fingerprint, FsOp, Result, StampError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// The output directory, owned entirely by the pipeline.
///
/// Files land under the same relative directory as their source with a
/// fingerprinted name. Writes go through a temp file in the destination
/// directory and a rename, so a crash never leaves a truncated file under a
/// name the manifest points at.
pub struct OutputStore {
    root: PathBuf,
}

/// A file copied into the store
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Fingerprint of the bytes that were written
    pub fingerprint: Fingerprint,
    /// Final file name, derived from the fingerprint
    pub name: String,
    pub path: PathBuf,
}

impl OutputStore {
    /// Create a store rooted at the given directory (nothing is touched yet)
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Delete the whole output tree if present, then recreate it empty
    pub fn reset(&self) -> Result<()> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root)
                .map_err(|e| StampError::fs(FsOp::Remove, &self.root, e))?;
        }
        fs::create_dir_all(&self.root)
            .map_err(|e| StampError::fs(FsOp::CreateDir, &self.root, e))
    }

    /// Make sure a directory mirroring `rel_dir` exists and return its path
    pub fn ensure_dir(&self, rel_dir: &Path) -> Result<PathBuf> {
        let dir = self.root.join(rel_dir);
        fs::create_dir_all(&dir).map_err(|e| StampError::fs(FsOp::CreateDir, &dir, e))?;
        Ok(dir)
    }

    /// Copy `source` into `rel_dir`, naming it from the fingerprint of the
    /// bytes copied.
    ///
    /// The content is hashed as it streams into the temp file, so the name
    /// always describes the bytes stored under it even if the source changes
    /// mid-run.
    pub fn copy_in(
        &self,
        source: &Path,
        rel_dir: &Path,
        name_for: impl FnOnce(&Fingerprint) -> String,
        preserve_mtime: bool,
    ) -> Result<StoredFile> {
        let dir = self.ensure_dir(rel_dir)?;

        let mut tmp =
            NamedTempFile::new_in(&dir).map_err(|e| StampError::fs(FsOp::Write, &dir, e))?;
        let mut input =
            fs::File::open(source).map_err(|e| StampError::fs(FsOp::Read, source, e))?;
        let fingerprint = Fingerprint::copy_from(&mut input, tmp.as_file_mut())
            .map_err(|e| StampError::fs(FsOp::Copy, source, e))?;

        let metadata = input
            .metadata()
            .map_err(|e| StampError::fs(FsOp::Read, source, e))?;
        if preserve_mtime {
            let modified = metadata
                .modified()
                .map_err(|e| StampError::fs(FsOp::Read, source, e))?;
            tmp.as_file()
                .set_modified(modified)
                .map_err(|e| StampError::fs(FsOp::Write, tmp.path(), e))?;
        }
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(|e| StampError::fs(FsOp::Write, tmp.path(), e))?;

        let name = name_for(&fingerprint);
        let path = dir.join(&name);
        tmp.persist(&path)
            .map_err(|e| StampError::fs(FsOp::Rename, &path, e.error))?;
        Ok(StoredFile {
            fingerprint,
            name,
            path,
        })
    }
}

/// Write `content` to `path` via a sibling temp file and a rename.
///
/// Parent directories are created first. An existing file is replaced.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| StampError::fs(FsOp::CreateDir, parent, e))?;

    let mut tmp =
        NamedTempFile::new_in(parent).map_err(|e| StampError::fs(FsOp::Write, parent, e))?;
    tmp.write_all(content)
        .and_then(|_| tmp.flush())
        .map_err(|e| StampError::fs(FsOp::Write, path, e))?;
    tmp.persist(path)
        .map_err(|e| StampError::fs(FsOp::Rename, path, e.error))?;
    Ok(())
}
