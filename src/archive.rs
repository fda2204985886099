use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};
use crate::error::{Result, SetupError};

/// Compression formats Zig archives are published in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    TarXz,
    TarGz,
    Zip,
}

impl ArchiveKind {
    /// Detects the format from the file name suffix.
    pub fn from_file_name(name: &str) -> Result<ArchiveKind> {
        if name.ends_with(".zip") {
            Ok(ArchiveKind::Zip)
        } else if name.ends_with(".tar.xz") {
            Ok(ArchiveKind::TarXz)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Ok(ArchiveKind::TarGz)
        } else {
            Err(SetupError::UnsupportedArchive(name.to_string()))
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            ArchiveKind::TarXz => ".tar.xz",
            ArchiveKind::TarGz => ".tar.gz",
            ArchiveKind::Zip => ".zip",
        }
    }
}

/// Unpacks a downloaded archive into a directory.
pub trait Extractor {
    /// Extracts `archive` into `dest`, keeping executable bits.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::ExtractionFailed`] if the archive can't be unpacked.
    fn extract(&self, archive: &Path, dest: &Path, kind: ArchiveKind) -> Result<()>;
}

/// [`Extractor`] built on the `tar`, `xz2`, `flate2` and `zip` crates.
#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveExtractor;

impl Extractor for ArchiveExtractor {
    fn extract(&self, archive: &Path, dest: &Path, kind: ArchiveKind) -> Result<()> {
        info!("Extracting {} to {}", archive.display(), dest.display());
        let result = match kind {
            ArchiveKind::TarXz => open(archive).and_then(|f| {
                unpack_tar(xz2::read::XzDecoder::new(BufReader::new(f)), dest)
            }),
            ArchiveKind::TarGz => open(archive).and_then(|f| {
                unpack_tar(flate2::read::GzDecoder::new(BufReader::new(f)), dest)
            }),
            ArchiveKind::Zip => open(archive).and_then(|f| unpack_zip(f, dest)),
        };
        result.map_err(|e| SetupError::ExtractionFailed {
            archive: archive.to_path_buf(),
            reason: format!("{e:#}"),
        })
    }
}

fn open(path: &Path) -> anyhow::Result<File> {
    Ok(File::open(path)?)
}

fn unpack_tar<R: Read>(reader: R, dest: &Path) -> anyhow::Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.set_preserve_permissions(true);
    archive.unpack(dest)?;
    debug!("tar extraction complete");
    Ok(())
}

fn unpack_zip(file: File, dest: &Path) -> anyhow::Result<()> {
    let mut archive = zip::ZipArchive::new(file)?;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let out_path = match entry.enclosed_name() {
            Some(path) => dest.join(path),
            None => {
                debug!("Skipping unsafe path in zip: {}", entry.name());
                continue;
            }
        };
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        if entry.is_symlink() {
            let mut target = String::new();
            entry.read_to_string(&mut target)?;
            link_entry(&target, &out_path)?;
            continue;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
            }
        }
    }
    debug!("zip extraction complete");
    Ok(())
}

/// Recreates a zip symlink entry. Targets that are absolute or climb out
/// with `..` are refused, like the tar unpacker refuses escaping paths.
fn link_entry(target: &str, link: &Path) -> anyhow::Result<()> {
    let target_path = Path::new(target);
    if target_path.is_absolute()
        || target_path.components().any(|c| c == std::path::Component::ParentDir)
    {
        anyhow::bail!("refusing symlink {} -> {}", link.display(), target);
    }
    if fs::symlink_metadata(link).is_ok() {
        fs::remove_file(link)?;
    }
    #[cfg(unix)]
    std::os::unix::fs::symlink(target_path, link)?;
    #[cfg(not(unix))]
    anyhow::bail!("cannot create symlink {} on this platform", link.display());
    Ok(())
}
