use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Flat directory holding one file per preset.
    pub presets_dir: PathBuf,

    /// JSON file standing in for the host's live component registry.
    pub live_state_path: PathBuf,

    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_file_extension() -> String {
    "json".into()
}

fn default_log_level() -> String {
    "info".into()
}
