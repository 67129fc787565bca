//! Debian package (.deb) bundler.
//!
//! A `.deb` is an `ar` archive holding three members, in this order:
//!
//! - `debian-binary` - format version, always `2.0`
//! - `control.tar.gz` - the `control` file and `md5sums`
//! - `data.tar.gz` - the files to install, relative to `/`
//!
//! The data archive is streamed into an anonymous temporary file while files
//! are added; the finished package is written next to its final path and only
//! renamed into place once complete.

use std::{
    collections::BTreeSet,
    fmt::Write as _,
    fs::File,
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use flate2::{Compression, write::GzEncoder};

use crate::{
    bail,
    bundler::{
        BundledArtifact,
        builder::{Progress, calculate_sha256},
        error::{ErrorExt, Result},
        settings::{Arch, Settings},
        utils::fs,
    },
    source::StagedFile,
};

const DEBIAN_BINARY: &[u8] = b"2.0\n";

const DIR_MODE: u32 = 0o755;

/// Builds the package at `<output>/<name>_<version>_<arch>.deb`.
///
/// `progress` hears about each staged file just before it is added and about
/// the package once it is in place. Fails without touching the output if the
/// package file already exists; any error, including one from `progress`,
/// aborts the build and leaves no package behind.
pub fn bundle_project(
    settings: &Settings,
    files: &[StagedFile],
    arch: Arch,
    progress: &mut impl Progress,
) -> Result<BundledArtifact> {
    let package_path = settings.package_path(arch);
    fs::ensure_absent(&package_path)?;

    log::info!(
        "Building {} for {} ({} staged files)",
        settings.package_name(),
        arch,
        files.len()
    );

    let mut package = DebianPackage::new(settings, arch)?;
    for file in files {
        let source = file.source(settings.staging_root())?;
        progress.adding(&source)?;
        package.add_file(&source, &file.install_path()?)?;
    }

    let mut temp = fs::create_sibling_temp(&package_path)?;
    package.write(temp.as_file_mut())?;
    temp.as_file()
        .sync_all()
        .fs_context("flushing package", temp.path())?;

    let size = temp
        .as_file()
        .metadata()
        .fs_context("reading package metadata", temp.path())?
        .len();
    let checksum = calculate_sha256(temp.path())?;

    fs::persist_noclobber(temp, &package_path)?;
    if let Err(error) = progress.wrote(&package_path) {
        std::fs::remove_file(&package_path)
            .fs_context("removing unreported package", &package_path)?;
        return Err(error);
    }
    log::info!("{} ({} bytes, sha256 {})", package_path.display(), size, checksum);

    Ok(BundledArtifact {
        path: package_path,
        arch,
        size,
        checksum,
    })
}

/// In-progress Debian package.
///
/// Owns the temporary data archive; dropping the package at any point
/// releases it.
pub struct DebianPackage {
    control: ControlFields,
    data: tar::Builder<GzEncoder<File>>,
    directories: BTreeSet<PathBuf>,
    md5sums: Vec<(String, String)>,
    installed_bytes: u64,
    mtime: u64,
}

/// Values written to the `control` file.
struct ControlFields {
    package: String,
    version: String,
    architecture: Arch,
    maintainer: String,
    depends: Option<String>,
    section: String,
    priority: String,
    homepage: Option<String>,
    summary: String,
    long_description: Option<String>,
}

impl DebianPackage {
    /// Starts a package with the metadata from `settings`.
    pub fn new(settings: &Settings, arch: Arch) -> Result<Self> {
        let package = settings.package();
        let debian = settings.debian();

        let control = ControlFields {
            package: package.name.clone(),
            version: package.version.clone(),
            architecture: arch,
            maintainer: package.maintainer_field(),
            depends: debian.depends.as_ref().map(|deps| deps.join(", ")),
            section: debian.section().to_string(),
            priority: debian.priority().to_string(),
            homepage: debian.homepage.clone(),
            summary: package.summary.clone(),
            long_description: debian.long_description.clone(),
        };

        let data_file = tempfile::tempfile().fs_context(
            "creating temporary data archive in",
            std::env::temp_dir(),
        )?;

        let mut data = tar::Builder::new(GzEncoder::new(data_file, Compression::default()));
        let mtime = settings.source_date_epoch().unwrap_or_else(now);

        let mut root = dir_header(mtime)?;
        append_entry(&mut data, &mut root, "./", io::empty())?;

        Ok(Self {
            control,
            data,
            directories: BTreeSet::new(),
            md5sums: Vec::new(),
            installed_bytes: 0,
            mtime,
        })
    }

    /// Adds the file at `source` to the package as `destination`.
    ///
    /// Regular files keep their permission bits; symlinks are stored as
    /// symlinks. Parent directories are created as needed.
    pub fn add_file(&mut self, source: &Path, destination: &Path) -> Result<()> {
        if destination.as_os_str().is_empty() {
            bail!("{} has no install path", source.display());
        }

        let metadata =
            std::fs::symlink_metadata(source).fs_context("reading staged file", source)?;

        if let Some(parent) = destination.parent() {
            self.add_parent_dirs(parent)?;
        }

        let member = format!("./{}", destination.to_string_lossy());
        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            let target = std::fs::read_link(source).fs_context("reading symlink", source)?;
            let mut header = self.header(tar::EntryType::Symlink, 0o777)?;
            append_link(&mut self.data, &mut header, &member, &target)
                .fs_context("adding symlink to package", source)?;
        } else if file_type.is_file() {
            let size = metadata.len();
            let file = File::open(source).fs_context("opening staged file", source)?;
            let mut contents = Md5Reader::new(file.take(size));

            let mut header = self.header(tar::EntryType::Regular, file_mode(&metadata))?;
            header.set_size(size);
            append_entry(&mut self.data, &mut header, &member, &mut contents)
                .fs_context("adding file to package", source)?;

            if contents.len != size {
                bail!("{} changed size while being packaged", source.display());
            }
            self.md5sums.push((
                format!("{:x}", contents.digest.finalize()),
                destination.to_string_lossy().into_owned(),
            ));
            self.installed_bytes += size;
        } else {
            bail!("{} is not a regular file or symlink", source.display());
        }

        log::debug!("added {} as {}", source.display(), destination.display());
        Ok(())
    }

    /// Writes the complete `.deb` to `out`, consuming the package.
    pub fn write<W: Write>(self, mut out: W) -> Result<()> {
        let Self {
            control,
            data,
            md5sums,
            installed_bytes,
            mtime,
            ..
        } = self;

        let mut data_file = data.into_inner()?.finish()?;
        let data_len = data_file.stream_position()?;
        data_file.seek(SeekFrom::Start(0))?;

        let control_tar = control_archive(&control, installed_bytes, &md5sums, mtime)?;

        let mut ar = ar::Builder::new(&mut out);
        ar.append(
            &ar_header("debian-binary", DEBIAN_BINARY.len() as u64, mtime),
            DEBIAN_BINARY,
        )?;
        ar.append(
            &ar_header("control.tar.gz", control_tar.len() as u64, mtime),
            control_tar.as_slice(),
        )?;
        ar.append(&ar_header("data.tar.gz", data_len, mtime), data_file)?;
        drop(ar);
        out.flush()?;

        Ok(())
    }

    fn add_parent_dirs(&mut self, parent: &Path) -> Result<()> {
        let mut current = PathBuf::new();
        for component in parent.components() {
            current.push(component);
            if self.directories.insert(current.clone()) {
                let mut header = dir_header(self.mtime)?;
                let member = format!("./{}/", current.to_string_lossy());
                append_entry(&mut self.data, &mut header, &member, io::empty())
                    .fs_context("adding directory to package", &current)?;
            }
        }
        Ok(())
    }

    fn header(&self, entry_type: tar::EntryType, mode: u32) -> Result<tar::Header> {
        entry_header(entry_type, mode, self.mtime)
    }
}

fn entry_header(entry_type: tar::EntryType, mode: u32, mtime: u64) -> Result<tar::Header> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(entry_type);
    header.set_mode(mode);
    header.set_mtime(mtime);
    header.set_size(0);
    header.set_uid(0);
    header.set_gid(0);
    header.set_username("root")?;
    header.set_groupname("root")?;
    Ok(header)
}

fn dir_header(mtime: u64) -> Result<tar::Header> {
    entry_header(tar::EntryType::Directory, DIR_MODE, mtime)
}

/// Appends an entry named exactly `name`.
///
/// `tar::Builder::append_data` normalises `./usr/bin/tool` to `usr/bin/tool`;
/// package members keep the `./` prefix, so the name is written here,
/// falling back to a GNU long name entry when it does not fit the header.
fn append_entry<W: Write, R: Read>(
    tar: &mut tar::Builder<W>,
    header: &mut tar::Header,
    name: &str,
    data: R,
) -> io::Result<()> {
    let field_len = header.as_old().name.len();
    if name.len() > field_len {
        append_long_name(tar, tar::EntryType::GNULongName, name.as_bytes())?;
    }

    let len = name.len().min(field_len);
    let field = &mut header.as_old_mut().name;
    field.fill(0);
    field[..len].copy_from_slice(&name.as_bytes()[..len]);
    header.set_cksum();
    tar.append(header, data)
}

/// Appends a symlink entry named exactly `name` pointing at `target`.
fn append_link<W: Write>(
    tar: &mut tar::Builder<W>,
    header: &mut tar::Header,
    name: &str,
    target: &Path,
) -> io::Result<()> {
    let target = target.to_string_lossy();
    let field_len = header.as_old().linkname.len();
    if target.len() > field_len {
        append_long_name(tar, tar::EntryType::GNULongLink, target.as_bytes())?;
    }

    let len = target.len().min(field_len);
    let field = &mut header.as_old_mut().linkname;
    field.fill(0);
    field[..len].copy_from_slice(&target.as_bytes()[..len]);
    append_entry(tar, header, name, io::empty())
}

/// Writes the GNU `././@LongLink` entry carrying a name too long for a header.
fn append_long_name<W: Write>(
    tar: &mut tar::Builder<W>,
    kind: tar::EntryType,
    name: &[u8],
) -> io::Result<()> {
    const LONG_LINK: &[u8] = b"././@LongLink";

    let mut header = tar::Header::new_gnu();
    header.as_old_mut().name[..LONG_LINK.len()].copy_from_slice(LONG_LINK);
    header.set_entry_type(kind);
    header.set_mode(0o644);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mtime(0);
    header.set_size(name.len() as u64 + 1);
    header.set_cksum();
    tar.append(&header, name.chain(&[0u8][..]))
}

/// Feeds everything read through it into an MD5 digest.
struct Md5Reader<R> {
    inner: R,
    digest: md5::Context,
    len: u64,
}

impl<R> Md5Reader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            digest: md5::Context::new(),
            len: 0,
        }
    }
}

impl<R: Read> Read for Md5Reader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.digest.consume(&buf[..n]);
        self.len += n as u64;
        Ok(n)
    }
}

fn ar_header(name: &str, size: u64, mtime: u64) -> ar::Header {
    let mut header = ar::Header::new(name.as_bytes().to_vec(), size);
    header.set_mode(0o100644);
    header.set_mtime(mtime);
    header
}

/// Builds `control.tar.gz` in memory.
fn control_archive(
    control: &ControlFields,
    installed_bytes: u64,
    md5sums: &[(String, String)],
    mtime: u64,
) -> Result<Vec<u8>> {
    let control_file = render_control(control, installed_bytes.div_ceil(1024));
    let md5sums_file = md5sums
        .iter()
        .fold(String::new(), |mut out, (digest, path)| {
            let _ = writeln!(out, "{digest}  {path}");
            out
        });

    let mut tar = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));

    let mut root = dir_header(mtime)?;
    append_entry(&mut tar, &mut root, "./", io::empty())?;

    for (name, contents) in [("./control", control_file), ("./md5sums", md5sums_file)] {
        let mut header = entry_header(tar::EntryType::Regular, 0o644, mtime)?;
        header.set_size(contents.len() as u64);
        append_entry(&mut tar, &mut header, name, contents.as_bytes())?;
    }

    Ok(tar.into_inner()?.finish()?)
}

/// Renders the `control` file.
fn render_control(control: &ControlFields, installed_kib: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Package: {}", control.package);
    let _ = writeln!(out, "Version: {}", control.version);
    let _ = writeln!(out, "Architecture: {}", control.architecture);
    let _ = writeln!(out, "Maintainer: {}", control.maintainer);
    let _ = writeln!(out, "Installed-Size: {installed_kib}");
    if let Some(depends) = &control.depends {
        let _ = writeln!(out, "Depends: {depends}");
    }
    let _ = writeln!(out, "Section: {}", control.section);
    let _ = writeln!(out, "Priority: {}", control.priority);
    if let Some(homepage) = &control.homepage {
        let _ = writeln!(out, "Homepage: {homepage}");
    }
    let _ = writeln!(out, "Description: {}", control.summary);
    if let Some(body) = &control.long_description {
        for line in body.lines() {
            if line.trim().is_empty() {
                out.push_str(" .\n");
            } else {
                let _ = writeln!(out, " {}", line.trim_end());
            }
        }
    }
    out
}

#[cfg(unix)]
fn file_mode(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn file_mode(_metadata: &std::fs::Metadata) -> u32 {
    0o644
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
