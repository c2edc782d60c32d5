//! Portable text form of a single preset.
//!
//! The blob is the same JSON a preset file holds, with no extra framing, so a
//! preset file's contents can be pasted straight into an import.

use crate::naming::resolve_import_name;
use crate::preset::{Config, Preset};
use crate::types::{KeyCombo, PresetId};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("text is not a preset: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("preset has no name")]
    MissingName,

    #[error("preset has no configs list")]
    MissingConfigs,
}

// Lenient mirror of `Preset`: required fields are checked by hand so the
// caller learns which one was missing, and the incoming id is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SharedPreset {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    key_combo: Option<KeyCombo>,
    #[serde(default)]
    is_local_only: bool,
    #[serde(default)]
    load_on_focus_change: Option<bool>,
    #[serde(default)]
    configs: Option<Vec<Config>>,
}

pub fn export_preset(preset: &Preset) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(preset)
}

/// Decodes a shared preset and fits it into the existing collection.
///
/// The result always carries a fresh id, and its name is renumbered when it
/// collides with existing names (see [`resolve_import_name`]).
pub fn import_preset(text: &str, existing: &[Preset]) -> Result<Preset, ImportError> {
    let shared: SharedPreset = serde_json::from_str(text.trim())?;

    let name = shared
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or(ImportError::MissingName)?;
    let configs = shared.configs.ok_or(ImportError::MissingConfigs)?;

    let name = resolve_import_name(&name, existing.iter().map(|p| p.name.as_str()));

    Ok(Preset {
        id: PresetId::now(),
        name,
        key_combo: shared.key_combo,
        is_local_only: shared.is_local_only,
        load_on_focus_change: shared.load_on_focus_change,
        configs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::Setting;

    fn melee() -> Preset {
        let mut p = Preset::empty("Melee");
        p.key_combo = Some(KeyCombo::new("ctrl+1"));
        p.load_on_focus_change = Some(true);
        p.configs.push(
            Config::new("Attack Styles", "attackIndicator")
                .with_enabled(true)
                .with_setting(Setting::with_value("style", "melee")),
        );
        p
    }

    #[test]
    fn exported_text_imports_with_fresh_id() {
        let original = melee();
        let text = export_preset(&original).unwrap();
        assert!(text.contains("\"name\": \"Melee\""));

        let imported = import_preset(&text, &[]).unwrap();
        assert_ne!(imported.id, original.id);
        assert_eq!(imported.name, "Melee");
        assert_eq!(imported.configs, original.configs);
        assert_eq!(imported.key_combo, original.key_combo);
        assert_eq!(imported.load_on_focus_change, Some(true));
    }

    #[test]
    fn importing_twice_numbers_the_copies() {
        let text = export_preset(&melee()).unwrap();
        let mut existing = vec![melee()];

        let first = import_preset(&text, &existing).unwrap();
        assert_eq!(first.name, "Melee (1)");
        existing.push(first);

        let second = import_preset(&text, &existing).unwrap();
        assert_eq!(second.name, "Melee (2)");
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            import_preset("definitely not json", &[]),
            Err(ImportError::Malformed(_))
        ));
    }

    #[test]
    fn missing_name_is_rejected() {
        let err = import_preset(r#"{"configs": []}"#, &[]).unwrap_err();
        assert!(matches!(err, ImportError::MissingName));
    }

    #[test]
    fn missing_configs_is_rejected() {
        let err = import_preset(r#"{"name": "Melee"}"#, &[]).unwrap_err();
        assert!(matches!(err, ImportError::MissingConfigs));
    }

    #[test]
    fn minimal_blob_is_accepted() {
        let p = import_preset(r#"{"name": "Bare", "configs": []}"#, &[]).unwrap();
        assert_eq!(p.name, "Bare");
        assert!(!p.is_local_only);
        assert!(p.key_combo.is_none());
    }
}
