use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use crate::archive::{ArchiveKind, Extractor};
use crate::error::{Result, SetupError};
use crate::fetch::{MirrorFetcher, Transport};
use crate::fsys::InstallFs;
use crate::index::BuildDescriptor;

/// Executable whose presence marks a version directory as complete.
#[cfg(windows)]
pub const ZIG_EXE: &str = "zig.exe";
#[cfg(not(windows))]
pub const ZIG_EXE: &str = "zig";

/// Name of the stable symlink inside the install root.
pub const CURRENT_LINK: &str = "current";

/// Derives the local archive name from a tarball URL: the last path
/// segment, without any query string.
pub fn archive_file_name(tarball: &str) -> Result<String> {
    let last = tarball.rsplit('/').next().unwrap_or_default();
    let name = last.split('?').next().unwrap_or_default();
    if name.is_empty() {
        return Err(SetupError::InvalidTarball(tarball.to_string()));
    }
    Ok(name.to_string())
}

/// Name of the directory an archive unpacks to: the file name with its
/// compression suffix removed.
pub fn version_dir_name(file_name: &str) -> Result<String> {
    let kind = ArchiveKind::from_file_name(file_name)?;
    let stem = file_name
        .strip_suffix(kind.suffix())
        .or_else(|| file_name.strip_suffix(".tgz"))
        .unwrap_or(file_name);
    Ok(stem.to_string())
}

/// Where a run ended up before the symlink was updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    /// The version directory was already complete; nothing was fetched.
    AlreadyInstalled,
    /// The archive was downloaded and extracted in this run.
    Extracted,
}

/// Everything an install touched on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub state: InstallState,
    /// The extracted version directory `current` now points at.
    pub version_dir: PathBuf,
    /// The `current` symlink.
    pub current_link: PathBuf,
    /// Temporary archive written (and removed again) during this run.
    pub archive_path: Option<PathBuf>,
}

impl InstallReport {
    pub fn downloaded(&self) -> bool {
        self.state == InstallState::Extracted
    }

    /// Path of the installed compiler.
    pub fn zig_path(&self) -> PathBuf {
        self.version_dir.join(ZIG_EXE)
    }
}

/// Materializes builds below an install root.
pub struct Installer<'a, F: InstallFs, X: Extractor> {
    root: &'a Path,
    fs: F,
    extractor: X,
    archive_timeout: Duration,
}

impl<'a, F: InstallFs, X: Extractor> Installer<'a, F, X> {
    pub fn new(root: &'a Path, fs: F, extractor: X, archive_timeout: Duration) -> Self {
        Self {
            root,
            fs,
            extractor,
            archive_timeout,
        }
    }

    /// Installs `build` unless it is already complete, then points `current` at it.
    ///
    /// # Errors
    ///
    /// - [`SetupError::AllMirrorsFailed`] if the archive can't be fetched.
    ///   Nothing is written to disk in that case.
    /// - [`SetupError::ExtractionFailed`] if unpacking fails or the archive
    ///   doesn't contain the compiler.
    /// - [`SetupError::Io`] for filesystem failures.
    pub fn install<T: Transport>(
        &self,
        build: &BuildDescriptor,
        fetcher: &MirrorFetcher<T>,
    ) -> Result<InstallReport> {
        let file_name = archive_file_name(&build.tarball)?;
        let kind = ArchiveKind::from_file_name(&file_name)?;
        let version_dir = self.root.join(version_dir_name(&file_name)?);

        let (state, archive_path) = if self.is_complete(&version_dir) {
            info!("{} is already installed", version_dir.display());
            (InstallState::AlreadyInstalled, None)
        } else {
            let archive_path = self.download_and_extract(&file_name, kind, &version_dir, fetcher)?;
            (InstallState::Extracted, Some(archive_path))
        };

        let current_link = self.relink(&version_dir)?;
        Ok(InstallReport {
            state,
            version_dir,
            current_link,
            archive_path,
        })
    }

    fn is_complete(&self, version_dir: &Path) -> bool {
        self.fs.exists(version_dir) && self.fs.exists(&version_dir.join(ZIG_EXE))
    }

    fn download_and_extract<T: Transport>(
        &self,
        file_name: &str,
        kind: ArchiveKind,
        version_dir: &Path,
        fetcher: &MirrorFetcher<T>,
    ) -> Result<PathBuf> {
        let bytes = fetcher.fetch(file_name, self.archive_timeout)?;

        self.fs.create_dir_all(self.root)?;
        let archive_path = self.root.join(file_name);
        self.fs.write(&archive_path, &bytes)?;
        debug!("Wrote {} bytes to {}", bytes.len(), archive_path.display());

        let extracted = self.extractor.extract(&archive_path, self.root, kind);
        if let Err(e) = self.fs.remove_file(&archive_path) {
            warn!("Could not remove {}: {}", archive_path.display(), e);
        }
        extracted?;

        if !self.is_complete(version_dir) {
            return Err(SetupError::ExtractionFailed {
                archive: archive_path,
                reason: format!("{} not found after extraction", version_dir.join(ZIG_EXE).display()),
            });
        }
        Ok(archive_path)
    }

    /// Replaces `current` with a fresh link to `version_dir`.
    fn relink(&self, version_dir: &Path) -> Result<PathBuf> {
        let link = self.root.join(CURRENT_LINK);
        match self.fs.remove_file(&link) {
            Ok(()) => debug!("Removed old {}", link.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        self.fs.symlink(version_dir, &link)?;
        info!("{} -> {}", link.display(), version_dir.display());
        Ok(link)
    }
}
