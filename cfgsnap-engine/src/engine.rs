use crate::traits::{HostApplier, LiveStateProvider, SettingWrite};
use cfgsnap_core::keybind::KeybindIndex;
use cfgsnap_core::matcher::active_presets;
use cfgsnap_core::preset::Preset;
use cfgsnap_core::types::{KeyCombo, PresetId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What applying one preset asked of the host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplyReport {
    pub preset_id: Option<PresetId>,
    pub settings_written: usize,
    pub components_toggled: usize,
    pub components_restarted: Vec<String>,
    /// Components the preset names that the host does not have right now.
    pub components_skipped: Vec<String>,
}

/// Reconciles stored presets against the host: applies them, cycles them on
/// key presses and fires focus-triggered ones.
pub struct PresetEngine {
    live: Arc<dyn LiveStateProvider>,
    applier: Arc<dyn HostApplier>,
}

impl PresetEngine {
    pub fn new(live: Arc<dyn LiveStateProvider>, applier: Arc<dyn HostApplier>) -> Self {
        Self { live, applier }
    }

    /// Writes every known value of `preset` into the host.
    ///
    /// Settings without a value are skipped. Components that received
    /// values under a foreign group are restarted once at the end, unless
    /// the preset turns them off. Components the host does not have are
    /// skipped, as the matcher skips them.
    pub fn load_preset(&self, preset: &Preset) -> anyhow::Result<ApplyReport> {
        let mut report = ApplyReport {
            preset_id: Some(preset.id),
            ..Default::default()
        };
        let live = self.live.current_configs()?;

        for config in &preset.configs {
            if !live.iter().any(|c| c.display_name == config.display_name) {
                log::warn!(
                    "'{}': component '{}' is not live, skipped",
                    preset.name,
                    config.display_name
                );
                report.components_skipped.push(config.display_name.clone());
                continue;
            }
            let mut needs_restart = false;

            for setting in &config.settings {
                let Some(value) = &setting.value else {
                    continue;
                };
                let write = SettingWrite {
                    component: config.display_name.clone(),
                    group: setting
                        .custom_group
                        .clone()
                        .unwrap_or_else(|| config.group_id.clone()),
                    key: setting.key.clone(),
                    value: value.clone(),
                    custom_group: setting.is_custom(),
                };
                self.applier.write_setting(&write)?;
                report.settings_written += 1;
                needs_restart |= write.custom_group;
            }

            if let Some(enabled) = config.enabled {
                self.applier
                    .set_component_enabled(&config.display_name, enabled)?;
                report.components_toggled += 1;
            }

            if needs_restart && config.enabled != Some(false) {
                self.applier.restart_component(&config.display_name)?;
                report.components_restarted.push(config.display_name.clone());
            }
        }

        log::info!(
            "applied preset '{}': {} setting(s), {} toggle(s), {} restart(s)",
            preset.name,
            report.settings_written,
            report.components_toggled,
            report.components_restarted.len()
        );
        Ok(report)
    }

    /// Handles a press of `combo`: applies the next bound preset in the cycle.
    ///
    /// Returns `None` when nothing is bound to the chord.
    pub fn on_key_combo(
        &self,
        keybinds: &KeybindIndex,
        combo: &KeyCombo,
    ) -> anyhow::Result<Option<ApplyReport>> {
        let live = self.live.current_configs()?;
        let Some(next) = keybinds.resolve_next(combo, &live) else {
            log::debug!("no preset bound to {combo}");
            return Ok(None);
        };
        log::info!("{combo} -> '{}'", next.name);
        self.load_preset(next).map(Some)
    }

    /// Applies, in collection order, every preset set to load on this kind of
    /// focus change.
    pub fn on_focus_change(
        &self,
        presets: &[Preset],
        gained: bool,
    ) -> anyhow::Result<Vec<ApplyReport>> {
        presets
            .iter()
            .filter(|p| p.load_on_focus_change == Some(gained))
            .map(|p| self.load_preset(p))
            .collect()
    }

    /// Presets live state currently satisfies.
    pub fn active_presets<'a>(&self, presets: &'a [Preset]) -> anyhow::Result<Vec<&'a Preset>> {
        let live = self.live.current_configs()?;
        Ok(active_presets(presets, &live))
    }
}
