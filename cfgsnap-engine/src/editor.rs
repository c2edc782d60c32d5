use crate::repository::{PresetRepository, RepositoryError};
use crate::session::EditSession;
use crate::traits::{LiveStateProvider, PresetStore};
use cfgsnap_core::custom::{CustomSettingError, CustomSettingInput};
use cfgsnap_core::preset::{Config, Preset, Setting};
use cfgsnap_core::types::PresetId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no preset is being edited")]
    NotEditing,

    #[error("component '{0}' has no live config")]
    MissingLiveConfig(String),

    #[error("invalid custom setting: {0}")]
    InvalidCustomSetting(#[from] CustomSettingError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("live state refresh failed: {0}")]
    Refresh(anyhow::Error),
}

/// Incremental editing of one preset.
///
/// The editor keeps a working copy of the attached preset. Each operation
/// changes the copy, writes its configs back into the repository and saves
/// the whole collection before returning.
#[derive(Debug, Default)]
pub struct PresetEditor {
    session: EditSession,
    edited: Option<Preset>,
}

impl PresetEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> EditSession {
        self.session
    }

    pub fn edited(&self) -> Option<&Preset> {
        self.edited.as_ref()
    }

    /// Makes `id` the edited preset, detaching whatever was edited before.
    pub fn attach<S: PresetStore>(
        &mut self,
        repo: &PresetRepository<S>,
        id: PresetId,
    ) -> Result<(), EditorError> {
        let preset = repo.get(id).ok_or(RepositoryError::NotFound(id))?.clone();
        self.detach();
        log::debug!("editing preset '{}' ({id})", preset.name);
        self.session = EditSession::Editing(id);
        self.edited = Some(preset);
        Ok(())
    }

    pub fn detach(&mut self) {
        if let EditSession::Editing(id) = self.session {
            log::debug!("detached from preset {id}");
            self.session = EditSession::Detached(id);
        }
        self.edited = None;
    }

    /// Adds a whole config, replacing one with the same display name.
    pub fn add_config<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        config: Config,
    ) -> Result<(), EditorError> {
        self.add_configs(repo, vec![config])
    }

    pub fn add_configs<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        configs: Vec<Config>,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        for config in configs {
            if config.is_empty() {
                log::debug!("not storing empty config '{}'", config.display_name);
                continue;
            }
            log::debug!("add config '{}'", config.display_name);
            preset.upsert_config(config);
        }
        self.commit(repo, false)
    }

    pub fn remove_config<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        display_name: &str,
    ) -> Result<(), EditorError> {
        self.remove_configs(repo, &[display_name])
    }

    pub fn remove_configs<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        display_names: &[&str],
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        for name in display_names {
            if preset.remove_config(name).is_some() {
                log::debug!("removed config '{name}'");
            }
        }
        self.commit(repo, false)
    }

    /// Adds one setting to the stored config of `component`.
    ///
    /// The config is created (with no enabled assertion) when the preset
    /// does not cover the component yet.
    pub fn add_setting<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        component: &Config,
        setting: Setting,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        log::debug!("add setting '{}' to '{}'", setting.key, component.display_name);
        match preset.config_mut(&component.display_name) {
            Some(stored) => {
                stored.upsert_setting(setting);
            }
            None => preset
                .configs
                .push(component.empty_like().with_setting(setting)),
        }
        self.commit(repo, false)
    }

    /// Removes one setting; a config left with nothing to assert goes with it.
    pub fn remove_setting<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        display_name: &str,
        key: &str,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        if let Some(stored) = preset.config_mut(display_name) {
            stored.remove_setting(key);
            log::debug!("removed setting '{key}' from '{display_name}'");
        }
        if preset.prune_if_empty(display_name) {
            log::debug!("config '{display_name}' is empty, removed");
        }
        self.commit(repo, false)
    }

    pub fn set_enabled<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        component: &Config,
        enabled: bool,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        match preset.config_mut(&component.display_name) {
            Some(stored) => stored.enabled = Some(enabled),
            None => preset
                .configs
                .push(component.empty_like().with_enabled(enabled)),
        }
        log::debug!("'{}' enabled={enabled}", component.display_name);
        self.commit(repo, false)
    }

    pub fn clear_enabled<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        display_name: &str,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        if let Some(stored) = preset.config_mut(display_name) {
            stored.enabled = None;
        }
        if preset.prune_if_empty(display_name) {
            log::debug!("config '{display_name}' is empty, removed");
        }
        self.commit(repo, false)
    }

    /// Adds a raw `<group>.<key>=<value>` setting to the config of `component`.
    ///
    /// Malformed input is rejected before anything changes. After saving,
    /// the host is asked to refresh live state, because a custom group may be
    /// shared with other components.
    pub fn add_custom_setting<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        live: &dyn LiveStateProvider,
        component: &Config,
        raw: &str,
    ) -> Result<(), EditorError> {
        let input = CustomSettingInput::parse(raw).inspect_err(|e| {
            log::warn!("ignoring custom setting '{raw}': {e}");
        })?;

        let preset = self.edited_mut()?;
        let stored = match preset
            .configs
            .iter()
            .position(|c| c.group_id == component.group_id)
        {
            Some(idx) => &mut preset.configs[idx],
            None => {
                preset.configs.push(component.empty_like());
                let last = preset.configs.len() - 1;
                &mut preset.configs[last]
            }
        };

        let custom_group = (input.group != component.group_id).then(|| input.group.clone());
        stored.upsert_setting(Setting {
            name: input.key.clone(),
            key: input.key,
            value: Some(input.value),
            custom_group,
            owning_config_name: Some(component.display_name.clone()),
        });
        log::debug!("added custom setting to '{}'", component.display_name);

        self.commit(repo, false)?;
        live.refresh().map_err(EditorError::Refresh)
    }

    /// Re-reads one stored config from live state.
    ///
    /// Only keys the stored config already had are kept, and an unasserted
    /// enabled state stays unasserted. A component the preset does not cover
    /// is left alone.
    pub fn update_configuration<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        live_config: &Config,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        if let Some(stored) = preset.config_mut(&live_config.display_name) {
            *stored = Config::reconciled(stored, live_config);
        }
        preset.prune_if_empty(&live_config.display_name);
        self.commit(repo, false)
    }

    /// Re-reads every stored config from live state.
    ///
    /// Each stored component must be live; otherwise nothing changes.
    pub fn update_all_modified<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        live: &[Config],
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;

        let mut refreshed = Vec::with_capacity(preset.configs.len());
        for stored in &preset.configs {
            let current = live
                .iter()
                .find(|c| c.display_name == stored.display_name)
                .ok_or_else(|| EditorError::MissingLiveConfig(stored.display_name.clone()))?;
            refreshed.push(Config::reconciled(stored, current));
        }
        refreshed.retain(|c| !c.is_empty());
        preset.configs = refreshed;

        self.commit(repo, false)
    }

    pub fn toggle_local_only<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
    ) -> Result<(), EditorError> {
        let preset = self.edited_mut()?;
        preset.is_local_only = !preset.is_local_only;
        log::debug!("'{}' local_only={}", preset.name, preset.is_local_only);
        self.commit(repo, true)
    }

    fn edited_mut(&mut self) -> Result<&mut Preset, EditorError> {
        self.edited.as_mut().ok_or(EditorError::NotEditing)
    }

    fn commit<S: PresetStore>(
        &mut self,
        repo: &mut PresetRepository<S>,
        with_local_only: bool,
    ) -> Result<(), EditorError> {
        let preset = self.edited.as_ref().ok_or(EditorError::NotEditing)?;
        let local = with_local_only.then_some(preset.is_local_only);
        repo.commit_configs(preset.id, &preset.configs, local)?;
        Ok(())
    }
}
