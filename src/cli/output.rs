//! User-facing output.
//!
//! Progress lines go to stdout; diagnostics go through `log`.

use std::{
    io::{self, Write},
    path::Path,
};

use crate::bundler::{Progress, Result};

/// Writes `Adding <path>` and `Wrote <package>` lines to stdout.
///
/// A line that cannot be written fails the build.
#[derive(Debug, Clone, Default)]
pub struct OutputManager;

impl OutputManager {
    /// Creates an output manager writing to stdout.
    pub fn new() -> Self {
        Self
    }

    fn line(message: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{message}")?;
        stdout.flush()
    }
}

impl Progress for OutputManager {
    fn adding(&mut self, source: &Path) -> Result<()> {
        Ok(Self::line(&format!("Adding {}", source.display()))?)
    }

    fn wrote(&mut self, package: &Path) -> Result<()> {
        Ok(Self::line(&format!("Wrote {}", package.display()))?)
    }
}
