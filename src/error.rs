use std::path::PathBuf;
use thiserror::Error;

/// Every way an install run can fail.
///
/// All variants are fatal: the binary reports the message on stderr and
/// exits non-zero. Failures of a single mirror never show up here, they are
/// logged by the fetcher and only surface as [`SetupError::AllMirrorsFailed`]
/// once the whole list is exhausted.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("could not fetch the version index from any mirror")]
    IndexUnavailable,

    #[error("failed to parse the version index: {0}")]
    IndexParse(#[from] serde_json::Error),

    #[error("unsupported platform: arch '{arch}', os '{os}'")]
    UnsupportedPlatform { arch: String, os: String },

    #[error("unknown version '{0}'")]
    UnknownVersion(String),

    #[error("version {version} has no build for {key}")]
    UnsupportedBuild { version: String, key: String },

    #[error("all mirrors failed for {filename}")]
    AllMirrorsFailed { filename: String },

    #[error("failed to extract {}: {reason}", archive.display())]
    ExtractionFailed { archive: PathBuf, reason: String },

    #[error("cannot derive an archive name from tarball url '{0}'")]
    InvalidTarball(String),

    #[error("unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = SetupError> = std::result::Result<T, E>;
