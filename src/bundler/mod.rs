//! Debian package bundling.
//!
//! Turns a staged file tree plus package metadata into a `.deb`:
//!
//! - [`settings`] - package metadata and bundler configuration
//! - [`builder`] - the [`Bundler`] pipeline and architecture reconciliation
//! - [`platform`] - ELF classification and `.deb` assembly
//! - [`utils`] - path and output file helpers

pub mod builder;
pub mod error;
pub mod platform;
pub mod settings;
pub mod utils;

use std::path::PathBuf;

pub use builder::{ArchTally, Bundler, Progress};
pub use error::{Error, Result};
pub use settings::{Arch, DebianSettings, PackageSettings, Settings, SettingsBuilder};

/// A package written by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundledArtifact {
    /// Path of the `.deb`.
    pub path: PathBuf,
    /// Architecture recorded in the package.
    pub arch: Arch,
    /// Size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the file.
    pub checksum: String,
}
