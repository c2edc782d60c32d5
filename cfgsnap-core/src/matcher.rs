use crate::preset::{Config, Preset};

/// Does the live config satisfy everything `target` asserts?
///
/// This is a subset match: live settings the target never captured are
/// ignored, and a target setting with no value matches anything.
pub fn match_config(live: &Config, target: Option<&Config>) -> bool {
    let Some(target) = target else {
        return false;
    };

    if let (Some(live_enabled), Some(target_enabled)) = (live.enabled, target.enabled) {
        if live_enabled != target_enabled {
            return false;
        }
    }

    target.settings.iter().all(|wanted| {
        let Some(expected) = wanted.value.as_deref() else {
            return true;
        };
        match live.setting(&wanted.key) {
            Some(actual) => actual.value.as_deref() == Some(expected),
            None => true,
        }
    })
}

/// Does live state currently satisfy the whole preset?
///
/// Components the host does not have right now are skipped.
pub fn match_preset(preset: &Preset, live: &[Config]) -> bool {
    preset.configs.iter().all(|target| {
        match live.iter().find(|c| c.display_name == target.display_name) {
            Some(current) => match_config(current, Some(target)),
            None => true,
        }
    })
}

/// Do two stored presets describe the same state?
///
/// Only components present in both are compared, in both directions.
pub fn presets_match(a: &Preset, b: &Preset) -> bool {
    covers(a, b) && covers(b, a)
}

fn covers(base: &Preset, other: &Preset) -> bool {
    other.configs.iter().all(|target| match base.config(&target.display_name) {
        Some(current) => match_config(current, Some(target)),
        None => true,
    })
}

/// Every preset that live state currently satisfies, in collection order.
pub fn active_presets<'a>(presets: &'a [Preset], live: &[Config]) -> Vec<&'a Preset> {
    presets.iter().filter(|p| match_preset(p, live)).collect()
}
