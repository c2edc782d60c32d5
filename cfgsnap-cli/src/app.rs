use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use cfgsnap_core::config::AppConfig;
use cfgsnap_core::preset::{Config, Preset};
use cfgsnap_core::types::{KeyCombo, PresetId};
use cfgsnap_engine::editor::{EditorError, PresetEditor};
use cfgsnap_engine::engine::{ApplyReport, PresetEngine};
use cfgsnap_engine::repository::{PresetRepository, RepositoryError};
use cfgsnap_engine::traits::LiveStateProvider;
use cfgsnap_runtime::host_file::JsonFileHost;
use cfgsnap_runtime::preset_store::FilePresetStore;

use crate::cli::{Command, EditOp, FocusChange};

pub struct App {
    repo: PresetRepository<FilePresetStore>,
    host: Arc<JsonFileHost>,
    engine: PresetEngine,
}

impl App {
    pub fn open(cfg: &AppConfig) -> anyhow::Result<Self> {
        let store =
            FilePresetStore::at_dir(&cfg.presets_dir).with_extension(cfg.file_extension.as_str());
        let repo = PresetRepository::open(store)?;
        let host = Arc::new(JsonFileHost::at_path(&cfg.live_state_path));
        let engine = PresetEngine::new(host.clone(), host.clone());
        Ok(Self { repo, host, engine })
    }

    pub fn run(&mut self, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
        match command {
            Command::List => self.list(out),
            Command::Show { preset } => {
                let id = self.select(&preset)?;
                self.show(id, out)
            }
            Command::Snapshot { name } => {
                let live = self.host.current_configs()?;
                let preset = Preset::from_live(name, &live);
                let same: Vec<String> = self
                    .repo
                    .find_equivalent(&preset)
                    .into_iter()
                    .map(|p| p.name.clone())
                    .collect();
                let name = preset.name.clone();
                let id = self.repo.add(preset)?;
                writeln!(out, "created '{name}' ({id})")?;
                if !same.is_empty() {
                    writeln!(out, "same state as: {}", same.join(", "))?;
                }
                Ok(())
            }
            Command::Create { name } => {
                let preset = Preset::empty(name);
                let name = preset.name.clone();
                let id = self.repo.add(preset)?;
                writeln!(out, "created '{name}' ({id})")?;
                Ok(())
            }
            Command::Delete { preset } => {
                let id = self.select(&preset)?;
                let removed = self.repo.delete(id)?;
                writeln!(out, "deleted '{}'", removed.name)?;
                Ok(())
            }
            Command::Rename { preset, name } => {
                let id = self.select(&preset)?;
                self.repo.rename(id, &name)?;
                writeln!(out, "renamed to '{}'", name.trim())?;
                Ok(())
            }
            Command::Bind { preset, combo } => {
                let id = self.select(&preset)?;
                let combo = combo.map(KeyCombo::new);
                self.repo.set_key_combo(id, combo.clone())?;
                match combo {
                    Some(c) => writeln!(out, "bound {c}")?,
                    None => writeln!(out, "binding cleared")?,
                }
                Ok(())
            }
            Command::FocusTrigger { preset, when } => {
                let id = self.select(&preset)?;
                self.repo.set_focus_trigger(id, when.as_option())?;
                writeln!(out, "focus trigger: {when:?}")?;
                Ok(())
            }
            Command::Update { preset } => {
                let id = self.select(&preset)?;
                let live = self.host.current_configs()?;
                self.repo.update_from_live(id, &live)?;
                writeln!(out, "updated '{preset}' from live state")?;
                Ok(())
            }
            Command::Export { preset, out: file } => {
                let id = self.select(&preset)?;
                let text = self.repo.export(id)?;
                match file {
                    Some(path) => std::fs::write(&path, text)
                        .with_context(|| format!("write {}", path.display()))?,
                    None => writeln!(out, "{text}")?,
                }
                Ok(())
            }
            Command::Import { file } => {
                let text = match file {
                    Some(path) => std::fs::read_to_string(&path)
                        .with_context(|| format!("read {}", path.display()))?,
                    None => std::io::read_to_string(std::io::stdin()).context("read stdin")?,
                };
                self.import(&text, out)
            }
            Command::Apply { preset } => {
                let id = self.select(&preset)?;
                let preset = self.preset(id)?.clone();
                let report = self.engine.load_preset(&preset)?;
                print_report(out, &preset.name, &report)
            }
            Command::Press { combo } => {
                let combo = KeyCombo::new(combo);
                match self.engine.on_key_combo(self.repo.keybinds(), &combo)? {
                    Some(report) => {
                        let name = report
                            .preset_id
                            .and_then(|id| self.repo.get(id))
                            .map(|p| p.name.clone())
                            .unwrap_or_default();
                        print_report(out, &name, &report)
                    }
                    None => {
                        writeln!(out, "nothing bound to {combo}")?;
                        Ok(())
                    }
                }
            }
            Command::Focus { change } => {
                let reports = self
                    .engine
                    .on_focus_change(self.repo.presets(), change == FocusChange::Gained)?;
                for report in &reports {
                    let name = report
                        .preset_id
                        .and_then(|id| self.repo.get(id))
                        .map(|p| p.name.clone())
                        .unwrap_or_default();
                    print_report(out, &name, report)?;
                }
                if reports.is_empty() {
                    writeln!(out, "no preset loads on this focus change")?;
                }
                Ok(())
            }
            Command::Edit { preset, op } => {
                let id = self.select(&preset)?;
                self.edit(id, op, out)
            }
        }
    }

    fn list(&self, out: &mut dyn Write) -> anyhow::Result<()> {
        let active: Vec<PresetId> = self
            .engine
            .active_presets(self.repo.presets())?
            .into_iter()
            .map(|p| p.id)
            .collect();

        for p in self.repo.presets() {
            let marker = if active.contains(&p.id) { '*' } else { ' ' };
            write!(out, "{marker} {}  {}", p.id, p.name)?;
            if let Some(combo) = &p.key_combo {
                write!(out, "  [{combo}]")?;
            }
            match p.load_on_focus_change {
                Some(true) => write!(out, "  on-focus-gain")?,
                Some(false) => write!(out, "  on-focus-loss")?,
                None => {}
            }
            if p.is_local_only {
                write!(out, "  local")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    fn show(&self, id: PresetId, out: &mut dyn Write) -> anyhow::Result<()> {
        let p = self.preset(id)?;
        writeln!(out, "{} ({})", p.name, p.id)?;
        if let Some(combo) = &p.key_combo {
            writeln!(out, "key: {combo}")?;
        }
        for config in &p.configs {
            write!(out, "  {} ({})", config.display_name, config.group_id)?;
            if let Some(enabled) = config.enabled {
                write!(out, " enabled={enabled}")?;
            }
            writeln!(out)?;
            for s in &config.settings {
                let value = s.value.as_deref().unwrap_or("*");
                match &s.custom_group {
                    Some(group) => writeln!(out, "    {} = {value}  [{group}]", s.key)?,
                    None => writeln!(out, "    {} = {value}", s.key)?,
                }
            }
        }
        Ok(())
    }

    fn import(&mut self, text: &str, out: &mut dyn Write) -> anyhow::Result<()> {
        match self.repo.import(text) {
            Ok(id) => {
                let name = self.preset(id)?.name.clone();
                writeln!(out, "imported '{name}' ({id})")?;
                Ok(())
            }
            Err(RepositoryError::Import(e)) => {
                log::warn!("import rejected: {e}");
                anyhow::bail!("nothing valid to import")
            }
            Err(e) => Err(e.into()),
        }
    }

    fn edit(&mut self, id: PresetId, op: EditOp, out: &mut dyn Write) -> anyhow::Result<()> {
        let mut editor = PresetEditor::new();
        editor.attach(&self.repo, id)?;

        match op {
            EditOp::AddConfig { component } => {
                let live = self.live_component(&component)?;
                editor.add_config(&mut self.repo, live)?;
            }
            EditOp::RemoveConfig { component } => {
                editor.remove_config(&mut self.repo, &component)?;
            }
            EditOp::AddSetting {
                component,
                key,
                any,
            } => {
                let live = self.live_component(&component)?;
                let mut setting = live
                    .setting(&key)
                    .cloned()
                    .with_context(|| format!("component '{component}' has no setting '{key}'"))?;
                if any {
                    setting.value = None;
                }
                editor.add_setting(&mut self.repo, &live, setting)?;
            }
            EditOp::RemoveSetting { component, key } => {
                editor.remove_setting(&mut self.repo, &component, &key)?;
            }
            EditOp::SetEnabled { component, enabled } => {
                let live = self.live_component(&component)?;
                editor.set_enabled(&mut self.repo, &live, enabled)?;
            }
            EditOp::ClearEnabled { component } => {
                editor.clear_enabled(&mut self.repo, &component)?;
            }
            EditOp::AddCustom { component, raw } => {
                let live = self.live_component(&component)?;
                match editor.add_custom_setting(&mut self.repo, self.host.as_ref(), &live, &raw) {
                    Ok(()) => {}
                    Err(EditorError::InvalidCustomSetting(e)) => {
                        writeln!(out, "ignored '{raw}': {e}")?;
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            EditOp::Refresh { component } => {
                let live = self.live_component(&component)?;
                editor.update_configuration(&mut self.repo, &live)?;
            }
            EditOp::RefreshAll => {
                let live = self.host.current_configs()?;
                editor.update_all_modified(&mut self.repo, &live)?;
            }
            EditOp::ToggleLocal => {
                editor.toggle_local_only(&mut self.repo)?;
            }
        }

        editor.detach();
        writeln!(out, "updated '{}'", self.preset(id)?.name)?;
        Ok(())
    }

    /// Resolves a preset by id, then by exact name.
    fn select(&self, selector: &str) -> anyhow::Result<PresetId> {
        if let Ok(raw) = selector.parse::<i64>()
            && self.repo.get(PresetId(raw)).is_some()
        {
            return Ok(PresetId(raw));
        }
        self.repo
            .find_by_name(selector)
            .map(|p| p.id)
            .with_context(|| format!("no preset named '{selector}'"))
    }

    fn preset(&self, id: PresetId) -> anyhow::Result<&Preset> {
        self.repo
            .get(id)
            .with_context(|| format!("no preset with id {id}"))
    }

    fn live_component(&self, name: &str) -> anyhow::Result<Config> {
        self.host
            .current_configs()?
            .into_iter()
            .find(|c| c.display_name == name)
            .with_context(|| format!("component '{name}' is not live"))
    }
}

fn print_report(out: &mut dyn Write, name: &str, report: &ApplyReport) -> anyhow::Result<()> {
    writeln!(
        out,
        "applied '{name}': {} setting(s), {} toggle(s)",
        report.settings_written, report.components_toggled
    )?;
    if !report.components_restarted.is_empty() {
        writeln!(out, "restarted: {}", report.components_restarted.join(", "))?;
    }
    if !report.components_skipped.is_empty() {
        writeln!(out, "not live, skipped: {}", report.components_skipped.join(", "))?;
    }
    Ok(())
}
