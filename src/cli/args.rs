//! Command line arguments and the environment.
//!
//! The tool takes no flags or subcommands: it always builds from the staging
//! layout in the current directory. `--help` and `--version` still work.

use clap::Parser;

/// Environment variable pinning the timestamp of every archive member.
pub const SOURCE_DATE_EPOCH: &str = "SOURCE_DATE_EPOCH";

/// Debian package builder for staged file trees
#[derive(Parser, Debug, Clone)]
#[command(
    name = "stage_bundler_deb",
    version,
    about = "Builds a .deb from a staged file tree",
    long_about = "Builds a Debian binary package from the files listed in the staging database.

Reads package metadata from spec/header, the staged file list from ./helper.db and
the files themselves from root/. The architecture is detected from the staged ELF
binaries (all if there are none). The package is written as <name>_<version>_<arch>.deb
and an existing file of that name is never overwritten.

Set SOURCE_DATE_EPOCH to pin archive timestamps for reproducible packages.

Exit code 0 = package written."
)]
pub struct Args {}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Reads `SOURCE_DATE_EPOCH` from the environment.
pub fn source_date_epoch() -> Result<Option<u64>, String> {
    parse_source_date_epoch(std::env::var(SOURCE_DATE_EPOCH).ok().as_deref())
}

/// Parses a `SOURCE_DATE_EPOCH` value. Unset and empty both mean "now".
fn parse_source_date_epoch(value: Option<&str>) -> Result<Option<u64>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(seconds) => seconds.parse().map(Some).map_err(|_| {
            format!("{SOURCE_DATE_EPOCH} must be a number of seconds, got {seconds:?}")
        }),
    }
}
