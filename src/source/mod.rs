//! Staged file list resolution.
//!
//! The staging tool records every file it places under the staging root in
//! a SQLite database. Files the user excluded stay in the table with
//! `excluded` set and are filtered out here.

use std::{
    fmt,
    path::{Component, Path, PathBuf},
};

use path_clean::PathClean;
use rusqlite::{Connection, OpenFlags};

use crate::bundler::{Error, Result};

/// Query returning every staged path that is not excluded.
const STAGED_FILES_SQL: &str = "SELECT path FROM package_file WHERE NOT excluded";

/// One file to include in the package, relative to the staging root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile(String);

impl StagedFile {
    /// Wraps a staged path. Empty paths are rejected.
    pub fn new(path: impl Into<String>) -> Result<Self> {
        let path = path.into();
        if path.is_empty() {
            return Err(Error::EmptyStagedPath);
        }
        Ok(Self(path))
    }

    /// The path exactly as recorded.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Install path inside the package: the staged path without leading `/`.
    pub fn destination(&self) -> &str {
        self.0.trim_start_matches('/')
    }

    /// Install path inside the package, lexically cleaned.
    ///
    /// Returns [`Error::StagedPathEscapesRoot`] when `..` components would
    /// leave the staging root. A path naming the root itself is empty.
    pub fn install_path(&self) -> Result<PathBuf> {
        let cleaned = Path::new(self.destination()).clean();
        match cleaned.components().next() {
            Some(Component::ParentDir) => Err(Error::StagedPathEscapesRoot(self.0.clone())),
            Some(Component::CurDir) | None => Ok(PathBuf::new()),
            Some(_) => Ok(cleaned),
        }
    }

    /// Location of the file on disk: `root` joined with the install path.
    pub fn source(&self, root: &Path) -> Result<PathBuf> {
        Ok(root.join(self.install_path()?).clean())
    }
}

impl fmt::Display for StagedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reads the staged file list from the database at `db_path`.
///
/// The database must already exist: SQLite would otherwise create an empty
/// file and the package would silently come out empty. Records come back in
/// the store's natural order.
pub fn enumerate(db_path: &Path) -> Result<Vec<StagedFile>> {
    if !db_path.exists() {
        return Err(Error::DatabaseNotFound(db_path.to_path_buf()));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;

    let mut stmt = conn.prepare(STAGED_FILES_SQL)?;
    let paths = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    log::debug!("{} staged files in {}", paths.len(), db_path.display());

    paths.into_iter().map(StagedFile::new).collect()
}
