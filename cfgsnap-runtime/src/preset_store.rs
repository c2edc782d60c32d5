use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use cfgsnap_core::naming::{file_stem, with_number};
use cfgsnap_core::preset::Preset;
use cfgsnap_core::types::PresetId;
use cfgsnap_engine::traits::PresetStore;
use serde::Deserialize;

use crate::files::{clear_dir, ensure_dir};

/// One JSON file per preset in a flat directory.
///
/// Saving always rewrites the whole directory, so renamed or deleted presets
/// never leave stale files behind.
#[derive(Debug, Clone)]
pub struct FilePresetStore {
    dir: PathBuf,
    extension: String,
}

impl FilePresetStore {
    pub fn at_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: "json".into(),
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_all(&self, presets: &[Preset]) -> anyhow::Result<()> {
        ensure_dir(&self.dir)?;
        clear_dir(&self.dir)?;

        for preset in presets {
            let path = self.free_path_for(preset);
            write_preset(&path, preset)?;
            log::debug!("saved preset '{}' to {}", preset.name, path.display());
        }

        log::info!(
            "saved {} preset(s) to {}",
            presets.len(),
            self.dir.display()
        );
        Ok(())
    }

    /// Loads every readable preset file, ordered by id.
    ///
    /// Ids are creation timestamps, so the result is in creation order no
    /// matter how the directory enumerates. Bad entries are logged and
    /// skipped; of two files with the same id the one whose file name sorts
    /// first wins. Only an unreadable directory is an error.
    pub fn load_all(&self) -> anyhow::Result<Vec<Preset>> {
        if !self.dir.exists() {
            log::info!("preset dir {} does not exist yet", self.dir.display());
            return Ok(vec![]);
        }

        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("failed to read preset dir: {}", self.dir.display()))?;

        let mut readable = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => readable.push(entry),
                Err(e) => log::warn!("skipping unreadable entry in {}: {e}", self.dir.display()),
            }
        }
        readable.sort_by_key(|e| e.file_name());

        let mut presets = Vec::new();
        let mut seen = HashSet::new();
        for entry in readable {
            let path = entry.path();

            match entry.file_type() {
                Ok(t) if t.is_file() => {}
                Ok(_) => {
                    log::warn!("invalid preset {}: not a regular file", path.display());
                    continue;
                }
                Err(e) => {
                    log::warn!("invalid preset {}: {e}", path.display());
                    continue;
                }
            }

            let preset = match read_preset(&path) {
                Ok(preset) => preset,
                Err(e) => {
                    log::warn!("discarding preset file {}: {e:#}", path.display());
                    continue;
                }
            };

            if !seen.insert(preset.id) {
                log::warn!(
                    "discarding preset file {}: id {} already loaded",
                    path.display(),
                    preset.id
                );
                continue;
            }
            presets.push(preset);
        }
        presets.sort_by_key(|p| p.id);

        log::info!(
            "loaded {} preset(s) from {}",
            presets.len(),
            self.dir.display()
        );
        Ok(presets)
    }

    fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", self.extension))
    }

    // First of `<stem>`, `<stem> (1)`, `<stem> (2)`, ... that is free or
    // already holds this same preset.
    fn free_path_for(&self, preset: &Preset) -> PathBuf {
        let stem = file_stem(&preset.name, preset.id);
        let mut candidate = self.path_for(&stem);
        let mut n = 0;
        while !is_free_for(&candidate, preset.id) {
            n += 1;
            candidate = self.path_for(&with_number(&stem, n));
        }
        candidate
    }
}

impl PresetStore for FilePresetStore {
    fn load_all(&self) -> anyhow::Result<Vec<Preset>> {
        FilePresetStore::load_all(self)
    }

    fn save_all(&self, presets: &[Preset]) -> anyhow::Result<()> {
        FilePresetStore::save_all(self, presets)
    }
}

#[derive(Deserialize)]
struct StoredId {
    id: PresetId,
}

fn is_free_for(path: &Path, id: PresetId) -> bool {
    if !path.exists() {
        return true;
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<StoredId>(&raw).ok())
        .is_some_and(|stored| stored.id == id)
}

fn read_preset(path: &Path) -> anyhow::Result<Preset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read preset: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse preset: {}", path.display()))
}

fn write_preset(path: &Path, preset: &Preset) -> anyhow::Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("failed to create: {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, preset)
        .with_context(|| format!("failed to encode preset: {}", path.display()))?;
    w.flush()
        .with_context(|| format!("failed to write: {}", path.display()))?;
    w.get_ref()
        .sync_all()
        .with_context(|| format!("failed to sync: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cfgsnap_core::preset::{Config, Setting};
    use cfgsnap_core::types::KeyCombo;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn full_preset(name: &str) -> Preset {
        let mut custom = Setting::with_value("fpsTarget", "50");
        custom.custom_group = Some("runelite".into());
        custom.owning_config_name = Some("Timers".into());

        let mut p = Preset::empty(name);
        p.key_combo = Some(KeyCombo::new("ctrl+shift+1"));
        p.is_local_only = true;
        p.load_on_focus_change = Some(false);
        p.configs.push(
            Config::new("Timers", "timers")
                .with_enabled(true)
                .with_setting(Setting::with_value("showFood", "true"))
                .with_setting(Setting::new("Hidden", "hidden", None))
                .with_setting(custom),
        );
        p.configs
            .push(Config::new("Idle Notifier", "idlenotifier").with_enabled(false));
        p
    }

    #[test]
    fn save_then_load_round_trips_every_field() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path().join("presets"));

        let presets = vec![full_preset("Melee"), Preset::empty("Empty"), full_preset("Ranged")];
        store.save_all(&presets).unwrap();

        assert_eq!(store.load_all().unwrap(), presets);
    }

    #[test]
    fn load_order_follows_creation_not_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());

        let presets = vec![Preset::empty("Zulu"), Preset::empty("Alpha"), Preset::empty("Mike")];
        store.save_all(&presets).unwrap();

        let names: Vec<String> = store.load_all().unwrap().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Zulu", "Alpha", "Mike"]);
    }

    #[test]
    fn same_name_different_id_gets_numbered_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());

        store
            .save_all(&[
                Preset::empty("Melee"),
                Preset::empty("Melee"),
                Preset::empty("Melee"),
            ])
            .unwrap();
        assert_eq!(
            file_names(dir.path()),
            vec!["Melee (1).json", "Melee (2).json", "Melee.json"]
        );
        assert_eq!(store.load_all().unwrap().len(), 3);
    }

    #[test]
    fn saving_drops_files_of_renamed_presets() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());

        let mut p = Preset::empty("Old name");
        store.save_all(std::slice::from_ref(&p)).unwrap();
        p.name = "New name".into();
        store.save_all(std::slice::from_ref(&p)).unwrap();

        assert_eq!(file_names(dir.path()), vec!["New name.json"]);
    }

    #[test]
    fn invalid_names_use_placeholder_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path()).with_extension(".preset");

        let mut p = Preset::empty("a/b?");
        p.id = PresetId(42);
        store.save_all(&[p]).unwrap();

        assert_eq!(file_names(dir.path()), vec!["preset-42.preset"]);
        assert_eq!(store.load_all().unwrap()[0].name, "a/b?");
    }

    #[test]
    fn overlong_name_does_not_wipe_the_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());
        let alpha = Preset::empty("Alpha");
        let bravo = Preset::empty("Bravo");
        store.save_all(&[alpha.clone(), bravo.clone()]).unwrap();

        let mut long = Preset::empty("x".repeat(300));
        long.id = PresetId(7);
        store.save_all(&[long, alpha, bravo]).unwrap();

        assert_eq!(
            file_names(dir.path()),
            vec!["Alpha.json", "Bravo.json", "preset-7.json"]
        );
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].name.len(), 300);
    }

    #[test]
    fn load_skips_bad_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());
        store.save_all(&[full_preset("Melee")]).unwrap();

        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("garbage.json"), "not json").unwrap();
        fs::write(dir.path().join("no-name.json"), r#"{"id": 5, "configs": []}"#).unwrap();
        fs::write(dir.path().join("no-configs.json"), r#"{"id": 6, "name": "x"}"#).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Melee");
    }

    #[test]
    fn load_keeps_one_preset_per_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path());
        let p = full_preset("Melee");
        store.save_all(std::slice::from_ref(&p)).unwrap();

        let copy = fs::read_to_string(dir.path().join("Melee.json")).unwrap();
        fs::write(dir.path().join("Melee copy.json"), copy).unwrap();

        let loaded = store.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, p.id);
    }

    #[test]
    fn missing_dir_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePresetStore::at_dir(dir.path().join("nope"));
        assert!(store.load_all().unwrap().is_empty());
    }
}
