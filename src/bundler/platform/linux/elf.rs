//! ELF machine type detection for staged files.

use std::{fs::File, io::Read, path::Path};

use goblin::elf::{Elf, header::header64::SIZEOF_EHDR};

use crate::bundler::settings::Arch;

/// Classifies a staged file by the machine type in its ELF header.
///
/// This never fails. A file that cannot be opened, is a symlink, is not ELF,
/// has a truncated header or targets an unsupported machine is
/// [`Arch::Unknown`]: scripts, data files and symlinks are ordinary package
/// members and must not influence the package architecture. Symlinks are
/// packaged as links, so their targets (often outside the staging root) are
/// never read.
pub fn classify(path: &Path) -> Arch {
    match read_machine(path) {
        Ok(machine) => Arch::from_elf_machine(machine),
        Err(reason) => {
            log::debug!("{}: no ELF architecture ({})", path.display(), reason);
            Arch::Unknown
        }
    }
}

/// Reads `e_machine` from the file header.
///
/// Only the header is read; the 64-bit header is the larger of the two.
fn read_machine(path: &Path) -> Result<u16, String> {
    let metadata = std::fs::symlink_metadata(path).map_err(|e| e.to_string())?;
    if metadata.file_type().is_symlink() {
        return Err("symbolic link".to_string());
    }

    let file = File::open(path).map_err(|e| e.to_string())?;

    let mut header = Vec::with_capacity(SIZEOF_EHDR);
    file.take(SIZEOF_EHDR as u64)
        .read_to_end(&mut header)
        .map_err(|e| e.to_string())?;

    let header = Elf::parse_header(&header).map_err(|e| e.to_string())?;
    Ok(header.e_machine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_RISCV, EM_X86_64};
    use std::io::Write;

    /// Minimal little-endian ELF header with no program or section headers.
    fn elf_header(is_64: bool, machine: u16) -> Vec<u8> {
        let (class, size) = if is_64 { (2u8, 64usize) } else { (1u8, 52usize) };
        let mut bytes = vec![0u8; size];
        bytes[..4].copy_from_slice(b"\x7fELF");
        bytes[4] = class;
        bytes[5] = 1; // ELFDATA2LSB
        bytes[6] = 1; // EV_CURRENT
        bytes[16..18].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
        bytes[18..20].copy_from_slice(&machine.to_le_bytes());
        bytes[20..24].copy_from_slice(&1u32.to_le_bytes());
        let ehsize_offset = if is_64 { 52 } else { 40 };
        bytes[ehsize_offset..ehsize_offset + 2].copy_from_slice(&(size as u16).to_le_bytes());
        bytes
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file
    }

    #[test]
    fn detects_64_bit_machines() {
        let amd64 = write_temp(&elf_header(true, EM_X86_64));
        let arm64 = write_temp(&elf_header(true, EM_AARCH64));

        assert_eq!(classify(amd64.path()), Arch::Amd64);
        assert_eq!(classify(arm64.path()), Arch::Arm64);
    }

    #[test]
    fn detects_32_bit_machines() {
        let i386 = write_temp(&elf_header(false, EM_386));
        let arm = write_temp(&elf_header(false, EM_ARM));

        assert_eq!(classify(i386.path()), Arch::I386);
        assert_eq!(classify(arm.path()), Arch::Arm);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let binary = dir.path().join("tool");
        std::fs::write(&binary, elf_header(true, EM_X86_64)).unwrap();
        let link = dir.path().join("tool-link");
        std::os::unix::fs::symlink(&binary, &link).unwrap();

        assert_eq!(classify(&binary), Arch::Amd64);
        assert_eq!(classify(&link), Arch::Unknown);
    }

    #[test]
    fn classification_is_repeatable() {
        let file = write_temp(&elf_header(true, EM_X86_64));
        assert_eq!(classify(file.path()), classify(file.path()));
    }

    #[test]
    fn every_failure_is_unknown() {
        let text = write_temp(b"#!/bin/sh\necho hello\n");
        let truncated = write_temp(&elf_header(true, EM_X86_64)[..10]);
        let riscv = write_temp(&elf_header(true, EM_RISCV));
        let empty = write_temp(b"");

        assert_eq!(classify(text.path()), Arch::Unknown);
        assert_eq!(classify(truncated.path()), Arch::Unknown);
        assert_eq!(classify(riscv.path()), Arch::Unknown);
        assert_eq!(classify(empty.path()), Arch::Unknown);
        assert_eq!(classify(Path::new("/definitely/not/here")), Arch::Unknown);
    }
}
