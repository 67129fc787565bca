//! Error types for bundling operations.
//!
//! Every failure in the packaging pipeline is fatal for the run, so the
//! variants here describe *what* went wrong precisely enough for the user
//! to fix the input and re-run.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

use super::settings::Arch;

/// Result type alias for bundler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading inputs or assembling a package.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Free-form error, used by [`bail!`](crate::bail) and [`Context`].
    #[error("{0}")]
    GenericError(String),

    /// Bare I/O error without a known path.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// I/O error with the operation and path that caused it.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What the bundler was doing.
        context: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        error: io::Error,
    },

    /// The package header file does not exist.
    #[error("{} not found", .0.display())]
    SpecNotFound(PathBuf),

    /// The package header file is malformed.
    #[error("{}:{line}: {reason}", path.display())]
    SpecParse {
        /// Header file path.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What is wrong with the line.
        reason: String,
    },

    /// A required header field is absent or empty.
    #[error("{} is missing required field `{field}`", path.display())]
    MissingField {
        /// Header file path.
        path: PathBuf,
        /// Field name as written in the header.
        field: &'static str,
    },

    /// The staged file database does not exist.
    #[error("{} not found", .0.display())]
    DatabaseNotFound(PathBuf),

    /// SQLite failure while reading the staged file list.
    #[error("staged file database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The staged file list contains an empty path.
    #[error("staged file list contains an empty path")]
    EmptyStagedPath,

    /// A staged path resolves outside the staging root.
    #[error("staged path {0:?} escapes the staging root")]
    StagedPathEscapesRoot(String),

    /// Binaries for more than one architecture were staged.
    #[error(
        "Found binaries for different architectures ({}). This is unsupported",
        join_arches(.0)
    )]
    ArchitectureConflict(Vec<Arch>),

    /// The output file already exists.
    #[error("{} already exists, not overwriting it", .0.display())]
    ArtifactExists(PathBuf),
}

fn join_arches(arches: &[Arch]) -> String {
    arches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Attaches filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with the operation being performed and its path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts `None` into a [`Error::GenericError`] with a message.
pub trait Context<T> {
    /// Returns the contained value or an error built from `msg`.
    fn context<C: Display>(self, msg: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, msg: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(msg.to_string()))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
