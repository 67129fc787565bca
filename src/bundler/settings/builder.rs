//! Builder for constructing Settings.

use super::{DebianSettings, PackageSettings, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Provides a fluent API for building bundler settings with validation.
///
/// # Examples
///
/// ```no_run
/// use stage_bundler_deb::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> stage_bundler_deb::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .package_settings(PackageSettings::default())
///     .staged_database("./helper.db")
///     .staging_root("root")
///     .output_directory("dist")
///     .source_date_epoch(Some(1_700_000_000))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    package_settings: Option<PackageSettings>,
    debian_settings: DebianSettings,
    staged_database: Option<PathBuf>,
    staging_root: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    source_date_epoch: Option<u64>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets package metadata.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets optional control file fields.
    ///
    /// Default: Empty [`DebianSettings`]
    pub fn debian_settings(mut self, settings: DebianSettings) -> Self {
        self.debian_settings = settings;
        self
    }

    /// Sets the SQLite store listing the staged files.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn staged_database<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staged_database = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory staged paths are resolved against.
    ///
    /// # Required
    ///
    /// This field is required for building.
    pub fn staging_root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.staging_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the directory the package is written to.
    ///
    /// Default: current working directory
    pub fn output_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Pins the timestamp of every archive member.
    ///
    /// Default: None (current time)
    pub fn source_date_epoch(mut self, epoch: Option<u64>) -> Self {
        self.source_date_epoch = epoch;
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing:
    /// - `package_settings`
    /// - `staged_database`
    /// - `staging_root`
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        Ok(Settings::new(
            self.package_settings
                .context("package_settings is required")?,
            self.debian_settings,
            self.staged_database
                .context("staged_database is required")?,
            self.staging_root.context("staging_root is required")?,
            self.output_directory
                .unwrap_or_else(|| PathBuf::from(".")),
            self.source_date_epoch,
        ))
    }
}
