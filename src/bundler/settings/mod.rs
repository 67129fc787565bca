//! Configuration structures for bundling operations.
//!
//! This module provides the configuration types for building a Debian
//! package: package metadata, optional control file fields, input and
//! output locations, and a builder for constructing settings.

mod arch;
mod builder;
mod core;
mod linux;
mod package;

// Re-export all public types
pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use self::core::Settings;
pub use linux::{DEFAULT_PRIORITY, DEFAULT_SECTION, DebianSettings};
pub use package::PackageSettings;
