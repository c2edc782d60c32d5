use cfgsnap_core::preset::{Config, Preset};
use serde::{Deserialize, Serialize};

/// One value the host should write into its configuration storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingWrite {
    /// Display name of the component the setting belongs to.
    pub component: String,
    pub group: String,
    pub key: String,
    pub value: String,

    // Set when `group` is not the component's own group; the host has to
    // restart the component before it picks the value up.
    pub custom_group: bool,
}

/// The host's live component registry.
///
/// Live configs are rebuilt by the host on every call; the core never caches them.
pub trait LiveStateProvider: Send + Sync {
    fn current_configs(&self) -> anyhow::Result<Vec<Config>>;

    /// Forces the host to re-derive every live value, including settings stored
    /// in groups shared between components.
    fn refresh(&self) -> anyhow::Result<()>;
}

/// Writes preset values back into the host.
pub trait HostApplier: Send + Sync {
    fn write_setting(&self, write: &SettingWrite) -> anyhow::Result<()>;

    fn set_component_enabled(&self, component: &str, enabled: bool) -> anyhow::Result<()>;

    /// Disable then re-enable a component so it re-reads its settings.
    fn restart_component(&self, component: &str) -> anyhow::Result<()>;
}

/// Whole-collection persistence for presets.
pub trait PresetStore {
    fn load_all(&self) -> anyhow::Result<Vec<Preset>>;

    fn save_all(&self, presets: &[Preset]) -> anyhow::Result<()>;
}
