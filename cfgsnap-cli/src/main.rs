mod app;
mod cli;

use std::path::{Path, PathBuf};

use anyhow::Context;
use cfgsnap_runtime::config_store::ConfigStore;
use cfgsnap_runtime::defaults::{CONFIG_FILENAME, default_app_config};
use clap::Parser;

use crate::app::App;
use crate::cli::CliArgs;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let cfg = ConfigStore::at_path(&config_path).load_or_init(|| default_app_config(&base_dir))?;

    init_logging(args.log_level.as_deref(), &cfg.log_level);
    log::debug!("config: {}", config_path.display());

    let mut app = App::open(&cfg)?;
    let stdout = std::io::stdout();
    app.run(args.command, &mut stdout.lock())
}

fn default_config_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir().context("no config directory on this platform")?;
    Ok(dir.join("cfgsnap").join(CONFIG_FILENAME))
}

// --log-level, then RUST_LOG, then the config file.
fn init_logging(flag: Option<&str>, configured: &str) {
    let filters = match (flag, std::env::var("RUST_LOG").ok()) {
        (Some(level), _) => level.to_string(),
        (None, Some(env)) if !env.trim().is_empty() => env,
        _ => configured.to_string(),
    };
    env_logger::Builder::new().parse_filters(&filters).init();
}
