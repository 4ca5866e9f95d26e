//! Zip packaging of an assembled part tree.
//!
//! The tree is first staged as real files in a scratch directory, then
//! zipped from there in tree order. The scratch directory is removed on
//! every exit path; a failed cleanup is logged and never surfaced.
//!
//! Entries carry a fixed timestamp and fixed permissions, so the same tree
//! always produces the same archive bytes.

use crate::error::{Error, Result};
use crate::package::PackageTree;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Turns a [`PackageTree`] into archive bytes.
#[derive(Debug, Clone, Default)]
pub struct Packager {
    scratch_root: Option<PathBuf>,
}

impl Packager {
    /// Create a packager that stages under the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage scratch directories under `root` instead.
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    /// Directory scratch directories are created in.
    pub fn scratch_root(&self) -> Option<&Path> {
        self.scratch_root.as_deref()
    }

    /// Stage and zip `tree`.
    pub fn package(&self, tree: &PackageTree) -> Result<Vec<u8>> {
        let scratch = self.create_scratch()?;
        let result = stage(tree, scratch.path()).and_then(|()| zip_staged(tree, scratch.path()));

        let scratch_path = scratch.path().to_path_buf();
        if let Err(e) = scratch.close() {
            log::warn!(
                "Failed to remove scratch directory {}: {}",
                scratch_path.display(),
                e
            );
        }

        let bytes = result?;
        log::debug!("Packaged {} parts into {} bytes", tree.len(), bytes.len());
        Ok(bytes)
    }

    fn create_scratch(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("pdf_office-");
        let created = match &self.scratch_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        created.map_err(|source| Error::PackageWrite {
            path: self.scratch_root.clone().unwrap_or_else(std::env::temp_dir),
            source,
        })
    }
}

fn stage(tree: &PackageTree, dir: &Path) -> Result<()> {
    for part in tree.parts() {
        let path = dir.join(&part.path);
        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &part.data)
        };
        write().map_err(|source| Error::PackageWrite {
            path: PathBuf::from(&part.path),
            source,
        })?;
    }
    log::trace!("Staged {} parts in {}", tree.len(), dir.display());
    Ok(())
}

fn zip_staged(tree: &PackageTree, dir: &Path) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(zip::DateTime::default())
        .unix_permissions(0o644);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for path in tree.paths() {
        let data = fs::read(dir.join(path))
            .map_err(|e| Error::Archive(format!("Failed to read staged part {}: {}", path, e)))?;
        zip.start_file(path, options)?;
        zip.write_all(&data)
            .map_err(|e| Error::Archive(format!("Failed to write entry {}: {}", path, e)))?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}
