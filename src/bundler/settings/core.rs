//! Core Settings struct and implementations.

use super::{Arch, DebianSettings, PackageSettings};
use std::path::{Path, PathBuf};

/// Main settings for bundler operations.
///
/// Central configuration for the bundler, constructed via [`SettingsBuilder`].
/// Contains package metadata, Debian control settings and the locations of
/// the staged inputs and the output directory.
///
/// # Examples
///
/// ```no_run
/// use stage_bundler_deb::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> stage_bundler_deb::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package_settings(PackageSettings {
///         name: "sample".into(),
///         version: "1.0".into(),
///         maintainer: "Jane Doe".into(),
///         maintainer_email: "jane@example.com".into(),
///         summary: "A sample package".into(),
///     })
///     .staged_database("helper.db")
///     .staging_root("root")
///     .build()?;
/// assert_eq!(settings.output_directory().to_str(), Some("."));
/// # Ok(())
/// # }
/// ```
///
/// [`SettingsBuilder`]: super::SettingsBuilder
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Optional control file fields.
    debian: DebianSettings,

    /// SQLite store listing the staged files.
    staged_database: PathBuf,

    /// Directory the staged relative paths are resolved against.
    staging_root: PathBuf,

    /// Directory the `.deb` is written to.
    output_directory: PathBuf,

    /// Fixed timestamp for archive members, for reproducible output.
    source_date_epoch: Option<u64>,
}

impl Settings {
    /// Returns the package name.
    pub fn package_name(&self) -> &str {
        &self.package.name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the package metadata.
    pub fn package(&self) -> &PackageSettings {
        &self.package
    }

    /// Returns the Debian control settings.
    pub fn debian(&self) -> &DebianSettings {
        &self.debian
    }

    /// Returns the staged file database path.
    pub fn staged_database(&self) -> &Path {
        &self.staged_database
    }

    /// Returns the staging root.
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    /// Returns the output directory.
    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Returns the fixed member timestamp, if configured.
    pub fn source_date_epoch(&self) -> Option<u64> {
        self.source_date_epoch
    }

    /// Filename of the package for the given architecture.
    ///
    /// Always `<name>_<version>_<arch>.deb`.
    pub fn package_file_name(&self, arch: Arch) -> String {
        format!("{}_{}_{}.deb", self.package.name, self.package.version, arch)
    }

    /// Full output path of the package for the given architecture.
    ///
    /// With the default output directory this is just the filename.
    pub fn package_path(&self, arch: Arch) -> PathBuf {
        let file_name = self.package_file_name(arch);
        if self.output_directory == Path::new(".") {
            PathBuf::from(file_name)
        } else {
            self.output_directory.join(file_name)
        }
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        debian: DebianSettings,
        staged_database: PathBuf,
        staging_root: PathBuf,
        output_directory: PathBuf,
        source_date_epoch: Option<u64>,
    ) -> Self {
        Self {
            package,
            debian,
            staged_database,
            staging_root,
            output_directory,
            source_date_epoch,
        }
    }
}
