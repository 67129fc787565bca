//! Command line interface for the Debian package builder.
//!
//! Loads the package header and runs the [`Bundler`] over the staging layout
//! in the current directory, reporting each staged file and the written
//! package on stdout.
//!
//! [`Bundler`]: crate::bundler::Bundler

mod args;
mod output;

pub use args::{Args, SOURCE_DATE_EPOCH};
pub use output::OutputManager;

use std::path::Path;

use crate::{
    bundler::{Bundler, SettingsBuilder},
    error::{CliError, Result},
    metadata,
};

/// Package header file.
pub const SPEC_PATH: &str = "spec/header";

/// SQLite store listing the staged files.
pub const DATABASE_PATH: &str = "./helper.db";

/// Directory the staged paths are relative to.
pub const STAGING_ROOT: &str = "root";

/// Main CLI entry point
///
/// The header is checked first; nothing else is read or written if it is
/// missing.
pub fn run() -> Result<i32> {
    Args::parse_args();

    let header = metadata::load_header(Path::new(SPEC_PATH))?;

    let source_date_epoch =
        args::source_date_epoch().map_err(|reason| CliError::InvalidArguments { reason })?;

    let settings = SettingsBuilder::new()
        .package_settings(header.package)
        .debian_settings(header.debian)
        .staged_database(DATABASE_PATH)
        .staging_root(STAGING_ROOT)
        .source_date_epoch(source_date_epoch)
        .build()?;

    Bundler::new(settings).bundle(&mut OutputManager::new())?;
    Ok(0)
}
