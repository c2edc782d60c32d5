#![allow(dead_code)]

use cfgsnap_core::preset::{Config, Preset, Setting};
use cfgsnap_engine::traits::{HostApplier, LiveStateProvider, PresetStore, SettingWrite};
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    pub saves: Mutex<Vec<Vec<Preset>>>,
}

impl MemoryStore {
    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap().len()
    }

    pub fn last_saved(&self) -> Vec<Preset> {
        self.saves.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl PresetStore for MemoryStore {
    fn load_all(&self) -> anyhow::Result<Vec<Preset>> {
        Ok(self.last_saved())
    }

    fn save_all(&self, presets: &[Preset]) -> anyhow::Result<()> {
        self.saves.lock().unwrap().push(presets.to_vec());
        Ok(())
    }
}

/// In-memory host: applying a write changes what it reports as live.
pub struct TestHost {
    pub live: Mutex<Vec<Config>>,
    pub writes: Mutex<Vec<SettingWrite>>,
    pub toggles: Mutex<Vec<(String, bool)>>,
    pub restarts: Mutex<Vec<String>>,
    pub refreshes: Mutex<usize>,
}

impl TestHost {
    pub fn new(live: Vec<Config>) -> Self {
        Self {
            live: Mutex::new(live),
            writes: Mutex::new(vec![]),
            toggles: Mutex::new(vec![]),
            restarts: Mutex::new(vec![]),
            refreshes: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> Vec<Config> {
        self.live.lock().unwrap().clone()
    }
}

impl LiveStateProvider for TestHost {
    fn current_configs(&self) -> anyhow::Result<Vec<Config>> {
        Ok(self.snapshot())
    }

    fn refresh(&self) -> anyhow::Result<()> {
        *self.refreshes.lock().unwrap() += 1;
        Ok(())
    }
}

impl HostApplier for TestHost {
    fn write_setting(&self, write: &SettingWrite) -> anyhow::Result<()> {
        let mut live = self.live.lock().unwrap();
        if let Some(cfg) = live.iter_mut().find(|c| c.display_name == write.component) {
            cfg.upsert_setting(Setting::with_value(&write.key, &write.value));
        }
        self.writes.lock().unwrap().push(write.clone());
        Ok(())
    }

    fn set_component_enabled(&self, component: &str, enabled: bool) -> anyhow::Result<()> {
        let mut live = self.live.lock().unwrap();
        if let Some(cfg) = live.iter_mut().find(|c| c.display_name == component) {
            cfg.enabled = Some(enabled);
        }
        self.toggles
            .lock()
            .unwrap()
            .push((component.to_string(), enabled));
        Ok(())
    }

    fn restart_component(&self, component: &str) -> anyhow::Result<()> {
        self.restarts.lock().unwrap().push(component.to_string());
        Ok(())
    }
}

pub fn timers_live() -> Config {
    Config::new("Timers", "timers")
        .with_enabled(true)
        .with_setting(Setting::with_value("showFood", "true"))
        .with_setting(Setting::with_value("showPots", "false"))
}

pub fn attack_live(style: &str) -> Config {
    Config::new("Attack Styles", "attackIndicator")
        .with_enabled(true)
        .with_setting(Setting::with_value("style", style))
}
