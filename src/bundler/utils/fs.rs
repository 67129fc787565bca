//! File system utilities for bundling.
//!
//! No-clobber output handling used when the finished package is moved into
//! place.

use std::{io, path::Path};

use tempfile::NamedTempFile;

use crate::bundler::error::{Error, ErrorExt, Result};

/// Fails with [`Error::ArtifactExists`] if `path` is already present.
///
/// Dangling symlinks count as present.
pub fn ensure_absent(path: &Path) -> Result<()> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Err(Error::ArtifactExists(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("checking output path", path),
    }
}

/// Creates a temporary file next to `target` so it can later be persisted
/// with a rename on the same filesystem.
pub fn create_sibling_temp(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tempfile::Builder::new()
        .prefix(".stage-bundler-")
        .suffix(".deb.tmp")
        .tempfile_in(dir)
        .fs_context("creating temporary package file in", dir)
}

/// Moves a finished temporary file to `target` without replacing an
/// existing file.
///
/// On failure the temporary file is removed when the error is dropped.
pub fn persist_noclobber(temp: NamedTempFile, target: &Path) -> Result<()> {
    match temp.persist_noclobber(target) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
            Err(Error::ArtifactExists(target.to_path_buf()))
        }
        Err(e) => Err(e.error).fs_context("writing package", target),
    }
}
