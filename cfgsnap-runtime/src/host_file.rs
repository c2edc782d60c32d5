use std::path::{Path, PathBuf};

use anyhow::Context;
use cfgsnap_core::preset::{Config, Setting};
use cfgsnap_engine::traits::{HostApplier, LiveStateProvider, SettingWrite};
use serde::{Deserialize, Serialize};

use crate::files::write_json_atomic;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveStateFile {
    #[serde(default)]
    pub components: Vec<Config>,
}

/// A host whose component registry is a JSON file.
///
/// Every call reads the file afresh, so there is no cache to refresh.
#[derive(Debug, Clone)]
pub struct JsonFileHost {
    path: PathBuf,
}

impl JsonFileHost {
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> anyhow::Result<LiveStateFile> {
        if !self.path.exists() {
            log::debug!("no live state at {}, treating as empty", self.path.display());
            return Ok(LiveStateFile::default());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read live state: {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("decode live state: {}", self.path.display()))
    }

    pub fn save(&self, state: &LiveStateFile) -> anyhow::Result<()> {
        write_json_atomic(&self.path, state)
    }

    fn modify<F>(&self, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut Vec<Config>) -> anyhow::Result<()>,
    {
        let mut state = self.load()?;
        f(&mut state.components)?;
        self.save(&state)
    }
}

impl LiveStateProvider for JsonFileHost {
    fn current_configs(&self) -> anyhow::Result<Vec<Config>> {
        Ok(self.load()?.components)
    }

    fn refresh(&self) -> anyhow::Result<()> {
        log::debug!("live state refresh: {}", self.path.display());
        Ok(())
    }
}

impl HostApplier for JsonFileHost {
    fn write_setting(&self, write: &SettingWrite) -> anyhow::Result<()> {
        self.modify(|components| {
            // The value lands in the component it was written for and in every
            // component that owns the storage group.
            for cfg in components.iter_mut() {
                let is_target = cfg.display_name == write.component;
                if !is_target && cfg.group_id != write.group {
                    continue;
                }
                match cfg.settings.iter_mut().find(|s| s.key == write.key) {
                    Some(existing) => existing.value = Some(write.value.clone()),
                    None if is_target => {
                        let mut s = Setting::with_value(&write.key, &write.value);
                        if write.custom_group {
                            s.custom_group = Some(write.group.clone());
                            s.owning_config_name = Some(write.component.clone());
                        }
                        cfg.settings.push(s);
                    }
                    None => {}
                }
            }
            Ok(())
        })
    }

    fn set_component_enabled(&self, component: &str, enabled: bool) -> anyhow::Result<()> {
        self.modify(|components| {
            let cfg = components
                .iter_mut()
                .find(|c| c.display_name == component)
                .with_context(|| format!("no live component named '{component}'"))?;
            cfg.enabled = Some(enabled);
            Ok(())
        })
    }

    fn restart_component(&self, component: &str) -> anyhow::Result<()> {
        let state = self.load()?;
        if !state.components.iter().any(|c| c.display_name == component) {
            anyhow::bail!("no live component named '{component}'");
        }
        log::info!("restarting component '{component}'");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with(components: Vec<Config>) -> (tempfile::TempDir, JsonFileHost) {
        let dir = tempfile::tempdir().unwrap();
        let host = JsonFileHost::at_path(dir.path().join("live.json"));
        host.save(&LiveStateFile { components }).unwrap();
        (dir, host)
    }

    #[test]
    fn missing_file_is_empty_live_state() {
        let dir = tempfile::tempdir().unwrap();
        let host = JsonFileHost::at_path(dir.path().join("absent.json"));
        assert!(host.current_configs().unwrap().is_empty());
    }

    #[test]
    fn writes_update_the_target_component() {
        let (_dir, host) = host_with(vec![
            Config::new("Timers", "timers")
                .with_enabled(true)
                .with_setting(Setting::with_value("showFood", "true")),
        ]);

        host.write_setting(&SettingWrite {
            component: "Timers".into(),
            group: "timers".into(),
            key: "showFood".into(),
            value: "false".into(),
            custom_group: false,
        })
        .unwrap();
        host.set_component_enabled("Timers", false).unwrap();

        let live = host.current_configs().unwrap();
        assert_eq!(live[0].enabled, Some(false));
        assert_eq!(live[0].setting("showFood").unwrap().value.as_deref(), Some("false"));
    }

    #[test]
    fn custom_group_writes_reach_the_owning_component_too() {
        let (_dir, host) = host_with(vec![
            Config::new("Timers", "timers"),
            Config::new("Core", "runelite").with_setting(Setting::with_value("fpsTarget", "30")),
        ]);

        host.write_setting(&SettingWrite {
            component: "Timers".into(),
            group: "runelite".into(),
            key: "fpsTarget".into(),
            value: "50".into(),
            custom_group: true,
        })
        .unwrap();

        let live = host.current_configs().unwrap();
        let timers = live[0].setting("fpsTarget").unwrap();
        assert_eq!(timers.value.as_deref(), Some("50"));
        assert_eq!(timers.custom_group.as_deref(), Some("runelite"));
        assert_eq!(
            live[1].setting("fpsTarget").unwrap().value.as_deref(),
            Some("50")
        );
    }

    #[test]
    fn unknown_component_is_an_error() {
        let (_dir, host) = host_with(vec![]);
        assert!(host.set_component_enabled("Nope", true).is_err());
        assert!(host.restart_component("Nope").is_err());
    }
}
