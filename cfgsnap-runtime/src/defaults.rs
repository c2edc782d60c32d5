use cfgsnap_core::config::AppConfig;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "config.json";
pub const PRESETS_DIRNAME: &str = "presets";
pub const LIVE_STATE_FILENAME: &str = "live.json";

pub fn default_app_config(base_dir: &Path) -> AppConfig {
    AppConfig {
        presets_dir: base_dir.join(PRESETS_DIRNAME),
        live_state_path: base_dir.join(LIVE_STATE_FILENAME),
        file_extension: "json".into(),
        log_level: "info".into(),
    }
}
