use crate::traits::PresetStore;
use anyhow::Context;
use cfgsnap_core::keybind::KeybindIndex;
use cfgsnap_core::matcher::presets_match;
use cfgsnap_core::preset::{Config, Preset};
use cfgsnap_core::sharing::{ImportError, export_preset, import_preset};
use cfgsnap_core::types::{KeyCombo, PresetId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no preset with id {0}")]
    NotFound(PresetId),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// The one owned preset collection.
///
/// Every mutation is followed by a keybind rebuild and a full save, so there
/// is never an in-memory state that differs from what is on disk.
pub struct PresetRepository<S: PresetStore> {
    store: S,
    presets: Vec<Preset>,
    keybinds: KeybindIndex,
}

impl<S: PresetStore> PresetRepository<S> {
    pub fn open(store: S) -> anyhow::Result<Self> {
        let presets = store.load_all().context("load presets")?;
        log::info!("opened preset collection: {} preset(s)", presets.len());
        let keybinds = KeybindIndex::rebuild(&presets);
        Ok(Self {
            store,
            presets,
            keybinds,
        })
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn keybinds(&self) -> &KeybindIndex {
        &self.keybinds
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    /// First preset with exactly this name. Names are not unique.
    pub fn find_by_name(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Stored presets, other than `preset` itself, that describe the same state.
    pub fn find_equivalent(&self, preset: &Preset) -> Vec<&Preset> {
        self.presets
            .iter()
            .filter(|p| p.id != preset.id && presets_match(p, preset))
            .collect()
    }

    pub fn add(&mut self, preset: Preset) -> Result<PresetId, RepositoryError> {
        let id = preset.id;
        log::info!("adding preset '{}' ({id})", preset.name);
        self.presets.push(preset);
        self.persist()?;
        Ok(id)
    }

    pub fn delete(&mut self, id: PresetId) -> Result<Preset, RepositoryError> {
        let idx = self
            .presets
            .iter()
            .position(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        let removed = self.presets.remove(idx);
        log::info!("deleted preset '{}' ({id})", removed.name);
        self.persist()?;
        Ok(removed)
    }

    pub fn rename(&mut self, id: PresetId, name: &str) -> Result<(), RepositoryError> {
        self.get_mut(id)?.name = name.trim().to_string();
        self.persist()
    }

    pub fn set_key_combo(
        &mut self,
        id: PresetId,
        combo: Option<KeyCombo>,
    ) -> Result<(), RepositoryError> {
        self.get_mut(id)?.key_combo = combo;
        self.persist()
    }

    pub fn set_focus_trigger(
        &mut self,
        id: PresetId,
        on_gain: Option<bool>,
    ) -> Result<(), RepositoryError> {
        self.get_mut(id)?.load_on_focus_change = on_gain;
        self.persist()
    }

    /// Refreshes every stored config of a preset from live state.
    ///
    /// Only keys the preset already captured are kept. Components that are not
    /// live right now keep their stored config untouched.
    pub fn update_from_live(&mut self, id: PresetId, live: &[Config]) -> Result<(), RepositoryError> {
        let preset = self.get_mut(id)?;
        for stored in preset.configs.iter_mut() {
            if let Some(current) = live.iter().find(|c| c.display_name == stored.display_name) {
                *stored = Config::reconciled(stored, current);
            }
        }
        preset.configs.retain(|c| {
            let keep = !c.is_empty();
            if !keep {
                log::debug!("config '{}' has nothing left to assert, removed", c.display_name);
            }
            keep
        });
        self.persist()
    }

    pub fn import(&mut self, text: &str) -> Result<PresetId, RepositoryError> {
        let preset = import_preset(text, &self.presets)?;
        self.add(preset)
    }

    pub fn export(&self, id: PresetId) -> Result<String, RepositoryError> {
        let preset = self.get(id).ok_or(RepositoryError::NotFound(id))?;
        Ok(export_preset(preset).context("encode preset")?)
    }

    /// Writes an edited preset's configs back into the collection and saves.
    pub(crate) fn commit_configs(
        &mut self,
        id: PresetId,
        configs: &[Config],
        is_local_only: Option<bool>,
    ) -> Result<(), RepositoryError> {
        let preset = self.get_mut(id)?;
        preset.configs = configs.to_vec();
        if let Some(local) = is_local_only {
            preset.is_local_only = local;
        }
        self.persist()
    }

    fn get_mut(&mut self, id: PresetId) -> Result<&mut Preset, RepositoryError> {
        self.presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))
    }

    fn persist(&mut self) -> Result<(), RepositoryError> {
        self.keybinds = KeybindIndex::rebuild(&self.presets);
        self.store
            .save_all(&self.presets)
            .context("save presets")?;
        Ok(())
    }
}
