//! Bundle orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that turns a staged
//! file list into a Debian package.
//!
//! # Overview
//!
//! The bundler:
//! 1. Reads the staged file list from the SQLite store
//! 2. Classifies every staged file by ELF machine type
//! 3. Reconciles the results into one package architecture
//! 4. Assembles and writes the `.deb`
//! 5. Returns a [`BundledArtifact`] describing it
//!
//! # Example
//!
//! ```no_run
//! use stage_bundler_deb::bundler::{Bundler, PackageSettings, SettingsBuilder};
//!
//! # fn example() -> stage_bundler_deb::bundler::Result<()> {
//! let settings = SettingsBuilder::new()
//!     .package_settings(PackageSettings {
//!         name: "sample".into(),
//!         version: "1.0".into(),
//!         maintainer: "Jane Doe".into(),
//!         maintainer_email: "jane@example.com".into(),
//!         summary: "A sample package".into(),
//!     })
//!     .staged_database("./helper.db")
//!     .staging_root("root")
//!     .build()?;
//!
//! let artifact = Bundler::new(settings).bundle(&mut ())?;
//! println!("Wrote {}", artifact.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`arch_detection`] - per-file architecture tally and reconciliation
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`progress`] - [`Progress`] callbacks for the user-facing output
//!
//! [`BundledArtifact`]: crate::bundler::BundledArtifact

pub mod arch_detection;
mod checksum;
mod orchestrator;
pub mod progress;

pub use arch_detection::ArchTally;
pub(crate) use checksum::calculate_sha256;
pub use orchestrator::Bundler;
pub use progress::Progress;
