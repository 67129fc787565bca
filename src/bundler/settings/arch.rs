//! CPU architecture types and utilities.

use std::fmt;

use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_X86_64};

/// Debian architecture of a staged file or of the whole package.
///
/// Individual files are tagged with one of the machine architectures or
/// [`Arch::Unknown`]; the package as a whole may additionally be
/// [`Arch::All`] when no binaries were staged.
///
/// # Examples
///
/// ```
/// use stage_bundler_deb::bundler::Arch;
///
/// assert_eq!(Arch::from_elf_machine(62), Arch::Amd64);
/// assert_eq!(Arch::Amd64.to_string(), "amd64");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Arch {
    /// x86 (32-bit) - `EM_386`
    I386,
    /// x86_64 / AMD64 (64-bit) - `EM_X86_64`
    Amd64,
    /// ARM (32-bit) - `EM_ARM`
    Arm,
    /// AArch64 / ARM64 (64-bit) - `EM_AARCH64`
    Arm64,
    /// Not an ELF binary for a supported machine.
    ///
    /// Missing files, non-ELF files and unsupported machine types all land
    /// here; none of them constrains the package architecture.
    Unknown,
    /// Architecture-independent package (no binaries detected).
    All,
}

impl Arch {
    /// Maps an ELF `e_machine` value to an architecture.
    pub fn from_elf_machine(machine: u16) -> Self {
        match machine {
            EM_386 => Self::I386,
            EM_X86_64 => Self::Amd64,
            EM_ARM => Self::Arm,
            EM_AARCH64 => Self::Arm64,
            _ => Self::Unknown,
        }
    }

    /// Debian name of the architecture, as used in control files and
    /// package filenames.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::I386 => "i386",
            Self::Amd64 => "amd64",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Unknown => "unknown",
            Self::All => "all",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
