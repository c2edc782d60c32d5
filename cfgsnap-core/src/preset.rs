use crate::types::{KeyCombo, PresetId};
use serde::{Deserialize, Serialize};

/// One configuration key inside one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub name: String,
    pub key: String,

    // `None` means the value could not be read (hidden timers, picker placeholders).
    #[serde(default)]
    pub value: Option<String>,

    /// Storage group, only when it differs from the owning config's group.
    #[serde(default)]
    pub custom_group: Option<String>,

    /// Display name of the config a custom setting belongs to.
    #[serde(default)]
    pub owning_config_name: Option<String>,
}

impl Setting {
    pub fn new(name: impl Into<String>, key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            value,
            custom_group: None,
            owning_config_name: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key, Some(value.into()))
    }

    pub fn is_custom(&self) -> bool {
        self.custom_group.is_some()
    }
}

/// One component's configuration block, either stored in a preset or read live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub display_name: String,
    pub group_id: String,

    // `None` means the preset does not assert an enabled state.
    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub settings: Vec<Setting>,
}

impl Config {
    pub fn new(display_name: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            group_id: group_id.into(),
            enabled: None,
            settings: Vec::new(),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_setting(mut self, setting: Setting) -> Self {
        self.upsert_setting(setting);
        self
    }

    /// Same component identity, no asserted state and no settings.
    pub fn empty_like(&self) -> Self {
        Self::new(self.display_name.clone(), self.group_id.clone())
    }

    /// A config with no settings and no enabled assertion carries no information.
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty() && self.enabled.is_none()
    }

    pub fn setting(&self, key: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.setting(key).is_some()
    }

    /// Appends `setting`, or replaces the entry that already uses its key.
    ///
    /// Returns `true` when a new key was added.
    pub fn upsert_setting(&mut self, setting: Setting) -> bool {
        match self.settings.iter_mut().find(|s| s.key == setting.key) {
            Some(existing) => {
                *existing = setting;
                false
            }
            None => {
                self.settings.push(setting);
                true
            }
        }
    }

    pub fn remove_setting(&mut self, key: &str) -> Option<Setting> {
        let idx = self.settings.iter().position(|s| s.key == key)?;
        Some(self.settings.remove(idx))
    }

    /// Builds the stored form of `live`, restricted to what `previous` already captured.
    ///
    /// Keys the previous version never held are left out, and the enabled
    /// state stays unasserted when it was unasserted before. Custom-setting
    /// tags are carried over from `previous` when the live entry lacks them.
    /// Custom settings the live config does not report are kept as stored,
    /// since their value lives in another component's group.
    pub fn reconciled(previous: &Config, live: &Config) -> Config {
        let mut settings: Vec<Setting> = live
            .settings
            .iter()
            .filter_map(|live_setting| {
                let old = previous.setting(&live_setting.key)?;
                let mut s = live_setting.clone();
                if s.custom_group.is_none() {
                    s.custom_group = old.custom_group.clone();
                }
                if s.owning_config_name.is_none() {
                    s.owning_config_name = old.owning_config_name.clone();
                }
                Some(s)
            })
            .collect();
        settings.extend(
            previous
                .settings
                .iter()
                .filter(|s| s.is_custom() && !live.contains_key(&s.key))
                .cloned(),
        );

        Config {
            display_name: live.display_name.clone(),
            group_id: live.group_id.clone(),
            enabled: previous.enabled.and(live.enabled),
            settings,
        }
    }
}

/// A named, stored snapshot of selected components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub name: String,

    #[serde(default)]
    pub key_combo: Option<KeyCombo>,

    #[serde(default)]
    pub is_local_only: bool,

    // Some(true): apply on focus gain. Some(false): apply on focus loss.
    #[serde(default)]
    pub load_on_focus_change: Option<bool>,

    pub configs: Vec<Config>,
}

impl Preset {
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            id: PresetId::now(),
            name: name.into(),
            key_combo: None,
            is_local_only: false,
            load_on_focus_change: None,
            configs: Vec::new(),
        }
    }

    /// Snapshots every live component that carries any state.
    pub fn from_live(name: impl Into<String>, live: &[Config]) -> Self {
        let mut preset = Self::empty(name);
        for config in live {
            if !config.is_empty() {
                preset.upsert_config(config.clone());
            }
        }
        preset
    }

    pub fn config(&self, display_name: &str) -> Option<&Config> {
        self.configs.iter().find(|c| c.display_name == display_name)
    }

    pub fn config_mut(&mut self, display_name: &str) -> Option<&mut Config> {
        self.configs
            .iter_mut()
            .find(|c| c.display_name == display_name)
    }

    pub fn config_by_group_mut(&mut self, group_id: &str) -> Option<&mut Config> {
        self.configs.iter_mut().find(|c| c.group_id == group_id)
    }

    /// Replaces the config with the same display name, or appends it.
    pub fn upsert_config(&mut self, config: Config) {
        match self.config_mut(&config.display_name) {
            Some(existing) => *existing = config,
            None => self.configs.push(config),
        }
    }

    pub fn remove_config(&mut self, display_name: &str) -> Option<Config> {
        let idx = self
            .configs
            .iter()
            .position(|c| c.display_name == display_name)?;
        Some(self.configs.remove(idx))
    }

    /// Drops the named config if it no longer carries anything.
    ///
    /// Returns `true` when the config was removed.
    pub fn prune_if_empty(&mut self, display_name: &str) -> bool {
        if self.config(display_name).is_some_and(Config::is_empty) {
            self.remove_config(display_name);
            return true;
        }
        false
    }
}
