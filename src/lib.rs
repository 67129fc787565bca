//! Debian package builder for staged file trees.
//!
//! This library builds a `.deb` from:
//! - a package header file with name, version, maintainer and summary
//! - a SQLite store listing the staged files
//! - the staging root the listed files live under
//!
//! The package architecture is detected from the ELF binaries among the
//! staged files. It can be used both as a CLI tool and as a library
//! dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;
pub mod source;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
