use std::path::PathBuf;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use crate::index::LatestStrategy;

/// Environment variable naming the install root.
pub const ZIG_HOME_ENV: &str = "ZIG_HOME";

/// Mirrors serving copies of ziglang.org downloads, in priority order.
pub const DEFAULT_MIRRORS: &[&str] = &[
    "https://pkg.machengine.org/zig",
    "https://zigmirror.hryx.net/zig",
];

pub const USER_AGENT: &str = "setup-zig";

/// Everything a run needs to know about its surroundings.
///
/// Built once in `main` and handed to every component; nothing else reads
/// the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub install_root: PathBuf,
    pub mirrors: Vec<String>,
    pub index_timeout: Duration,
    pub archive_timeout: Duration,
    pub user_agent: String,
    pub latest: LatestStrategy,
}

impl Config {
    /// Creates a config rooted at `install_root` with default mirrors and timeouts.
    pub fn new(install_root: PathBuf) -> Self {
        Self {
            install_root,
            mirrors: DEFAULT_MIRRORS.iter().map(|m| m.to_string()).collect(),
            index_timeout: Duration::from_secs(10),
            archive_timeout: Duration::from_secs(120),
            user_agent: USER_AGENT.to_string(),
            latest: LatestStrategy::default(),
        }
    }

    /// Replaces the mirror list unless `mirrors` is empty.
    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        if !mirrors.is_empty() {
            self.mirrors = mirrors;
        }
        self
    }

    pub fn with_latest(mut self, latest: LatestStrategy) -> Self {
        self.latest = latest;
        self
    }
}

/// Picks the install root: an explicit override wins, otherwise `~/.zig`.
///
/// The result is always absolute. `current` links to a path below the root
/// and ends up on `PATH`, so a relative root would dangle as soon as either
/// is resolved from another directory.
pub fn resolve_install_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let root = match explicit {
        Some(root) => root,
        None => {
            let dirs = BaseDirs::new().ok_or_else(|| anyhow!("Could not determine home directory"))?;
            default_install_root(dirs.home_dir().to_path_buf())
        }
    };
    std::path::absolute(&root)
        .with_context(|| format!("Could not resolve install root {}", root.display()))
}

pub fn default_install_root(home: PathBuf) -> PathBuf {
    home.join(".zig")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_install_root(Some(PathBuf::from("/opt/zig"))).unwrap();
        assert_eq!(root, PathBuf::from("/opt/zig"));
    }

    #[test]
    fn test_relative_root_made_absolute() {
        let root = resolve_install_root(Some(PathBuf::from("zh"))).unwrap();
        assert!(root.is_absolute());
        assert_eq!(root, std::env::current_dir().unwrap().join("zh"));
    }

    #[test]
    fn test_default_root_under_home() {
        assert_eq!(
            default_install_root(PathBuf::from("/home/dev")),
            PathBuf::from("/home/dev/.zig")
        );
    }

    #[test]
    fn test_defaults() {
        let config = Config::new(PathBuf::from("/tmp/zig"));
        assert_eq!(config.mirrors.len(), 2);
        assert_eq!(config.mirrors[0], "https://pkg.machengine.org/zig");
        assert!(config.index_timeout < config.archive_timeout);
        assert_eq!(config.latest, LatestStrategy::DocumentOrder);
    }

    #[test]
    fn test_empty_mirror_override_keeps_defaults() {
        let config = Config::new(PathBuf::from("/tmp/zig")).with_mirrors(vec![]);
        assert_eq!(config.mirrors.len(), 2);
        let config = config.with_mirrors(vec!["http://localhost:8080".to_string()]);
        assert_eq!(config.mirrors, vec!["http://localhost:8080".to_string()]);
    }
}
