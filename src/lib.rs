//! # zig-setup Core Library
//!
//! This crate contains the building blocks of the `zig-setup` tool, which installs prebuilt
//! Zig toolchains into a per-user directory and keeps a stable `current` link pointing at the
//! selected version.
//!
//! A run is a straight pipeline: fetch the version index from the mirrors, match the host
//! platform and requested version against it, fetch the archive, extract it and repoint
//! `current`. Concurrent runs against the same install root are not coordinated and may race.
//!
//! ## Modules Overview
//! - [`config`] – Install root, mirror list and timeouts for a run
//! - [`fetch`] – Retrieving files from an ordered list of mirrors
//! - [`index`] – Parsing the version index and resolving version tokens
//! - [`platform`] – Mapping the host architecture and OS to index keys
//! - [`installer`] – Downloading, extracting and linking a build
//! - [`archive`] – Unpacking `.tar.xz`, `.tar.gz` and `.zip` archives
//! - [`fsys`] – Filesystem seam used by the installer
//! - [`shell`] – The PATH export line and version check
//! - [`logging`] – stderr diagnostics
//! - [`error`] – The error taxonomy


pub mod archive;
pub mod config;
pub mod error;
pub mod fetch;
pub mod fsys;
pub mod index;
pub mod installer;
pub mod logging;
pub mod platform;
pub mod shell;

pub use archive::*;
pub use config::*;
pub use error::SetupError;
pub use fetch::*;
pub use fsys::*;
pub use index::*;
pub use installer::*;
pub use platform::*;
pub use shell::*;
