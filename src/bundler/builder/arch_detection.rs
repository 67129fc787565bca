//! Package architecture detection.
//!
//! Staged files are classified one by one into an [`ArchTally`]; the tally is
//! then reconciled into the single architecture written to the control file
//! and the package filename.

use std::collections::BTreeMap;

use crate::bundler::{Error, Result, settings::Arch};

/// Count of staged files per detected architecture.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchTally {
    counts: BTreeMap<Arch, usize>,
}

impl ArchTally {
    /// Creates an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one file with the given architecture.
    pub fn record(&mut self, arch: Arch) {
        *self.counts.entry(arch).or_insert(0) += 1;
    }

    /// Number of files recorded for `arch`.
    pub fn count(&self, arch: Arch) -> usize {
        self.counts.get(&arch).copied().unwrap_or(0)
    }

    /// Decides the package architecture.
    ///
    /// [`Arch::Unknown`] entries never constrain the result. No detected
    /// architecture yields [`Arch::All`]; exactly one yields that
    /// architecture; more than one is an [`Error::ArchitectureConflict`].
    pub fn reconcile(mut self) -> Result<Arch> {
        self.counts.remove(&Arch::Unknown);

        let mut detected = self.counts.into_keys();
        match (detected.next(), detected.next()) {
            (None, _) => Ok(Arch::All),
            (Some(arch), None) => Ok(arch),
            (Some(first), Some(second)) => {
                let found = [first, second].into_iter().chain(detected).collect();
                Err(Error::ArchitectureConflict(found))
            }
        }
    }
}

impl FromIterator<Arch> for ArchTally {
    fn from_iter<I: IntoIterator<Item = Arch>>(iter: I) -> Self {
        let mut tally = Self::new();
        for arch in iter {
            tally.record(arch);
        }
        tally
    }
}
