use std::path::PathBuf;
use clap::{Parser, ValueEnum};
use zig_setup::{LatestStrategy, ZIG_HOME_ENV};

/// Usage: `eval "$(zig-setup 0.14.1)"`
#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Version to install: `latest`, `master` or a release such as `0.14.1`
    #[clap(id = "zig_version", value_name = "VERSION", default_value = "latest")]
    pub version: String,

    /// Install root (defaults to ~/.zig)
    #[clap(long, env = ZIG_HOME_ENV)]
    pub root: Option<PathBuf>,

    /// Mirror base URL; repeat to set several, in priority order
    #[clap(long = "mirror", value_name = "URL")]
    pub mirrors: Vec<String>,

    /// How `latest` is chosen from the index
    #[clap(long, value_enum, default_value_t = LatestBy::Order)]
    pub latest_by: LatestBy,

    /// Log debug output to stderr
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LatestBy {
    /// First release listed in the index
    Order,
    /// Highest semantic version in the index
    Semver,
}

impl From<LatestBy> for LatestStrategy {
    fn from(value: LatestBy) -> Self {
        match value {
            LatestBy::Order => LatestStrategy::DocumentOrder,
            LatestBy::Semver => LatestStrategy::Semver,
        }
    }
}
