use std::fmt;
use crate::error::{Result, SetupError};

/// CPU architectures Zig publishes builds for that we know how to install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    X86_64,
    Aarch64,
}

/// Operating systems we know how to install for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    Macos,
}

impl Arch {
    /// Maps a raw machine string (`uname -m` style or a Rust target arch)
    /// to the manifest vocabulary. The table is closed: no fuzzy matching.
    pub fn from_raw(raw: &str) -> Option<Arch> {
        match raw {
            "x86_64" | "AMD64" | "amd64" => Some(Arch::X86_64),
            "aarch64" | "arm64" => Some(Arch::Aarch64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
        }
    }
}

impl Os {
    /// Maps a raw OS name (`uname -s` style or a Rust target os)
    /// to the manifest vocabulary.
    pub fn from_raw(raw: &str) -> Option<Os> {
        match raw {
            "Linux" | "linux" => Some(Os::Linux),
            "Darwin" | "macos" => Some(Os::Macos),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Os::Linux => "linux",
            Os::Macos => "macos",
        }
    }
}

/// An (arch, os) pair as used for the build keys of the version index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
    pub arch: Arch,
    pub os: Os,
}

impl Platform {
    /// Resolves a platform from raw strings.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnsupportedPlatform`] if either string is not in
    /// its lookup table.
    pub fn from_raw(arch: &str, os: &str) -> Result<Platform> {
        match (Arch::from_raw(arch), Os::from_raw(os)) {
            (Some(arch), Some(os)) => Ok(Platform { arch, os }),
            _ => Err(SetupError::UnsupportedPlatform {
                arch: arch.to_string(),
                os: os.to_string(),
            }),
        }
    }

    /// The platform this binary was built for.
    ///
    /// This reads the compile-time target (`std::env::consts`), not `uname`.
    /// A binary running under emulation (an x86_64 build under Rosetta 2, say)
    /// installs the toolchain for its own target, which is the one it can run.
    /// Use [`Platform::from_raw`] to match strings reported at runtime.
    pub fn current() -> Result<Platform> {
        Platform::from_raw(std::env::consts::ARCH, std::env::consts::OS)
    }

    /// Build key inside a version entry, e.g. `x86_64-linux`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.arch.as_str(), self.os.as_str())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
