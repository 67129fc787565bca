//! Linux packaging: ELF architecture detection and `.deb` assembly.

pub mod debian;
pub mod elf;
