use anyhow::{Context, Result};
use colored::Colorize;
use tracing::{info, warn};
use zig_setup::{
    fetch_index, path_export_line, resolve_install_root, zig_version, ArchiveExtractor, Config,
    HttpTransport, Installer, LocalFs, MirrorFetcher, Platform,
};
use crate::cli::CLI;

pub fn execute(cli: CLI) -> Result<()> {
    let root = resolve_install_root(cli.root)?;
    let config = Config::new(root)
        .with_mirrors(cli.mirrors)
        .with_latest(cli.latest_by.into());
    execute_install(&config, &cli.version)
}

pub fn execute_install(config: &Config, version: &str) -> Result<()> {
    let platform = Platform::current()?;
    let fetcher = MirrorFetcher::new(HttpTransport::new(), config.mirrors.clone(), config.user_agent.as_str());

    let index = fetch_index(&fetcher, config.index_timeout)?;
    let version = index.resolve_version(version, config.latest)?;
    let build = index.build_for(&version, &platform)?;
    if let Some(entry) = index.get(&version) {
        info!("Selected zig {} for {}", entry.describe(&version), platform);
    }

    let installer = Installer::new(&config.install_root, LocalFs, ArchiveExtractor, config.archive_timeout);
    let report = installer
        .install(build, &fetcher)
        .with_context(|| format!("Failed to install zig {version}"))?;

    println!("{}", path_export_line(&report.current_link));
    match zig_version(&report.zig_path()) {
        Ok(installed) => eprintln!("{} Zig {}", "✓".green(), installed),
        Err(e) => warn!("Installed {}, but could not query its version: {:#}", report.version_dir.display(), e),
    }
    Ok(())
}
