//! Build progress reporting.

use std::path::Path;

use crate::bundler::Result;

/// Receives the user-facing progress of a build.
///
/// Both callbacks are part of the build: an error from either aborts it and
/// no package is left behind.
pub trait Progress {
    /// Called with each staged file's source path just before it is added.
    fn adding(&mut self, source: &Path) -> Result<()>;

    /// Called with the package path once it has been moved into place.
    ///
    /// An error here removes the package again.
    fn wrote(&mut self, package: &Path) -> Result<()>;
}

/// Silent progress, for library callers that report the artifact themselves.
impl Progress for () {
    fn adding(&mut self, _source: &Path) -> Result<()> {
        Ok(())
    }

    fn wrote(&mut self, _package: &Path) -> Result<()> {
        Ok(())
    }
}
