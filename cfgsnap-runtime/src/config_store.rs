use anyhow::Context;
use cfgsnap_core::config::AppConfig;
use std::path::{Path, PathBuf};

use crate::files::write_json_atomic;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<AppConfig> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read config: {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("decode config: {}", self.path.display()))
    }

    /// Loads the config, writing `default` out first when no file exists yet.
    pub fn load_or_init(&self, default: impl FnOnce() -> AppConfig) -> anyhow::Result<AppConfig> {
        if self.path.exists() {
            return self.load();
        }
        let cfg = default();
        log::info!("creating default config at {}", self.path.display());
        self.save(&cfg)?;
        Ok(cfg)
    }

    pub fn save(&self, cfg: &AppConfig) -> anyhow::Result<()> {
        write_json_atomic(&self.path, cfg)
    }
}
