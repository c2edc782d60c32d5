use crate::matcher::match_preset;
use crate::preset::{Config, Preset};
use crate::types::KeyCombo;
use std::collections::HashMap;

/// Key chord -> presets bound to it, in collection order.
///
/// Always rebuilt from the full collection; never patched in place.
#[derive(Debug, Clone, Default)]
pub struct KeybindIndex {
    bindings: HashMap<KeyCombo, Vec<Preset>>,
}

impl KeybindIndex {
    pub fn rebuild(presets: &[Preset]) -> Self {
        let mut bindings: HashMap<KeyCombo, Vec<Preset>> = HashMap::new();
        for preset in presets {
            if let Some(combo) = &preset.key_combo {
                bindings.entry(combo.clone()).or_default().push(preset.clone());
            }
        }
        Self { bindings }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn combos(&self) -> impl Iterator<Item = &KeyCombo> {
        self.bindings.keys()
    }

    pub fn bound(&self, combo: &KeyCombo) -> &[Preset] {
        self.bindings.get(combo).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Picks the preset after the first bound one live state currently matches.
    ///
    /// Wraps around after the last entry, and starts from the first one when
    /// nothing matches. `None` only when the chord has no bindings.
    pub fn resolve_next(&self, combo: &KeyCombo, live: &[Config]) -> Option<&Preset> {
        let bound = self.bound(combo);
        if bound.is_empty() {
            return None;
        }

        let next = match bound.iter().position(|p| match_preset(p, live)) {
            Some(i) if i + 1 < bound.len() => i + 1,
            _ => 0,
        };
        bound.get(next)
    }
}
