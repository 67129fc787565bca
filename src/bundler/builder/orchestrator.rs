//! Main bundler orchestration and coordination.
//!
//! This module provides the [`Bundler`] orchestrator that runs the packaging
//! pipeline: enumerate staged files, detect the architecture, assemble the
//! package.

use crate::{
    bundler::{
        BundledArtifact, Result, Settings,
        platform::linux::{debian, elf},
        settings::Arch,
    },
    source::{self, StagedFile},
};

use super::{arch_detection::ArchTally, progress::Progress};

/// Main bundler orchestrator.
///
/// Runs every stage strictly in sequence and stops at the first error.
///
/// # Examples
///
/// ```no_run
/// use stage_bundler_deb::bundler::{Bundler, Settings};
///
/// # fn example(settings: Settings) -> stage_bundler_deb::bundler::Result<()> {
/// let bundler = Bundler::new(settings);
/// let artifact = bundler.bundle(&mut ())?;
/// println!("Created {} ({} bytes)", artifact.path.display(), artifact.size);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bundler {
    settings: Settings,
}

impl Bundler {
    /// Creates a new bundler with the given settings.
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Builds the package.
    ///
    /// `progress` is told about each staged file as it is added and about the
    /// package once it is in place; an error from it fails the build.
    ///
    /// # Errors
    ///
    /// Fails if the staged file store is missing or unreadable, if binaries
    /// for more than one architecture are staged, if a staged file cannot be
    /// added, or if the package file already exists.
    pub fn bundle(&self, progress: &mut impl Progress) -> Result<BundledArtifact> {
        let files = source::enumerate(self.settings.staged_database())?;
        log::info!(
            "Found {} staged files in {}",
            files.len(),
            self.settings.staged_database().display()
        );

        let arch = self.detect_arch(&files)?;
        log::info!("Package architecture: {}", arch);

        debian::bundle_project(&self.settings, &files, arch, progress)
    }

    /// Classifies every staged file and reconciles the package architecture.
    pub fn detect_arch(&self, files: &[StagedFile]) -> Result<Arch> {
        let root = self.settings.staging_root();
        let mut tally = ArchTally::new();

        for file in files {
            let arch = match file.source(root) {
                Ok(path) => elf::classify(&path),
                Err(_) => Arch::Unknown,
            };
            log::debug!("{}: {}", file, arch);
            tally.record(arch);
        }

        tally.reconcile()
    }
}
