//! Shared fixtures for integration tests: a temporary working directory laid
//! out like the staging tool leaves it (`spec/header`, `helper.db`, `root/`).
#![allow(dead_code)] // Each test binary uses a different subset

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use rusqlite::Connection;
use stage_bundler_deb::{
    bundler::{Settings, SettingsBuilder},
    metadata,
};
use tempfile::TempDir;

pub use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_X86_64};

/// Fixed member timestamp so builds are comparable.
pub const EPOCH: u64 = 1_700_000_000;

/// Temporary working directory with the staging layout.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Creates an empty working directory with a `sample 1.0` header.
    pub fn new() -> Result<Self> {
        let fixture = Self {
            dir: TempDir::new()?,
        };
        std::fs::create_dir_all(fixture.root())?;
        fixture.write_header("sample", "1.0")?;
        Ok(fixture)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn root(&self) -> PathBuf {
        self.path().join("root")
    }

    pub fn header_path(&self) -> PathBuf {
        self.path().join("spec").join("header")
    }

    pub fn database_path(&self) -> PathBuf {
        self.path().join("helper.db")
    }

    pub fn write_header(&self, name: &str, version: &str) -> Result<()> {
        let path = self.header_path();
        std::fs::create_dir_all(path.parent().context("header has no parent")?)?;
        std::fs::write(
            path,
            format!(
                "Name: {name}\n\
                 Version: {version}\n\
                 Packager: Jane Doe\n\
                 PackagerEmail: jane@example.com\n\
                 Summary: s\n"
            ),
        )?;
        Ok(())
    }

    /// Writes `contents` to `root/<path>`.
    pub fn stage(&self, path: &str, contents: &[u8]) -> Result<PathBuf> {
        let full = self.root().join(path.trim_start_matches('/'));
        std::fs::create_dir_all(full.parent().context("staged file has no parent")?)?;
        std::fs::write(&full, contents)?;
        Ok(full)
    }

    /// Stages a header-only ELF executable for `machine`.
    pub fn stage_elf(&self, path: &str, machine: u16) -> Result<PathBuf> {
        self.stage(path, &elf_header(machine))
    }

    /// Creates `helper.db` with one `package_file` row per entry.
    pub fn write_database(&self, rows: &[(&str, bool)]) -> Result<()> {
        let conn = Connection::open(self.database_path())?;
        conn.execute_batch(
            "CREATE TABLE package_file (path TEXT NOT NULL, excluded BOOLEAN NOT NULL)",
        )?;
        for (path, excluded) in rows {
            conn.execute(
                "INSERT INTO package_file (path, excluded) VALUES (?1, ?2)",
                rusqlite::params![path, excluded],
            )?;
        }
        Ok(())
    }

    /// Settings for building in this fixture, written to its own directory.
    pub fn settings(&self) -> Result<Settings> {
        let header = metadata::load_header(&self.header_path())?;
        Ok(SettingsBuilder::new()
            .package_settings(header.package)
            .debian_settings(header.debian)
            .staged_database(self.database_path())
            .staging_root(self.root())
            .output_directory(self.path())
            .source_date_epoch(Some(EPOCH))
            .build()?)
    }

    /// Names of the `.deb` files and leftovers in the working directory.
    pub fn outputs(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(self.path())? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".deb") || name.ends_with(".tmp") {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Minimal 64-bit little-endian ELF header (32-bit layout for `EM_386`/`EM_ARM`).
pub fn elf_header(machine: u16) -> Vec<u8> {
    let is_64 = !matches!(machine, EM_386 | EM_ARM);
    let (class, size) = if is_64 { (2u8, 64usize) } else { (1u8, 52usize) };
    let mut bytes = vec![0u8; size];
    bytes[..4].copy_from_slice(b"\x7fELF");
    bytes[4] = class;
    bytes[5] = 1;
    bytes[6] = 1;
    bytes[16..18].copy_from_slice(&2u16.to_le_bytes());
    bytes[18..20].copy_from_slice(&machine.to_le_bytes());
    bytes[20..24].copy_from_slice(&1u32.to_le_bytes());
    let ehsize_offset = if is_64 { 52 } else { 40 };
    bytes[ehsize_offset..ehsize_offset + 2].copy_from_slice(&(size as u16).to_le_bytes());
    bytes
}

/// One entry of a tar member.
#[derive(Debug)]
pub struct TarEntry {
    pub path: String,
    pub kind: tar::EntryType,
    pub mode: u32,
    pub link: Option<String>,
    pub contents: Vec<u8>,
}

/// Decoded `.deb`.
#[derive(Debug)]
pub struct DebContents {
    pub members: Vec<String>,
    pub debian_binary: Vec<u8>,
    pub control: Vec<TarEntry>,
    pub data: Vec<TarEntry>,
}

impl DebContents {
    pub fn control_file(&self, name: &str) -> Option<String> {
        self.control
            .iter()
            .find(|e| e.path.trim_start_matches("./") == name)
            .map(|e| String::from_utf8_lossy(&e.contents).into_owned())
    }

    pub fn data_entry(&self, path: &str) -> Option<&TarEntry> {
        self.data
            .iter()
            .find(|e| e.path.trim_start_matches("./").trim_end_matches('/') == path)
    }
}

/// Reads the `ar` container and both tarballs of a `.deb`.
pub fn read_deb(path: &Path) -> Result<DebContents> {
    let mut archive = ar::Archive::new(File::open(path)?);
    let mut deb = DebContents {
        members: Vec::new(),
        debian_binary: Vec::new(),
        control: Vec::new(),
        data: Vec::new(),
    };

    while let Some(entry) = archive.next_entry() {
        let mut entry = entry?;
        let name = String::from_utf8(entry.header().identifier().to_vec())?;
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;

        match name.as_str() {
            "debian-binary" => deb.debian_binary = bytes,
            "control.tar.gz" => deb.control = read_tar_gz(&bytes)?,
            "data.tar.gz" => deb.data = read_tar_gz(&bytes)?,
            _ => {}
        }
        deb.members.push(name);
    }

    Ok(deb)
}

fn read_tar_gz(bytes: &[u8]) -> Result<Vec<TarEntry>> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let mut entries = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        let path = entry.path()?.to_string_lossy().into_owned();
        let kind = entry.header().entry_type();
        let mode = entry.header().mode()?;
        let link = entry
            .link_name()?
            .map(|link| link.to_string_lossy().into_owned());
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents)?;
        entries.push(TarEntry {
            path,
            kind,
            mode,
            link,
            contents,
        });
    }
    Ok(entries)
}
