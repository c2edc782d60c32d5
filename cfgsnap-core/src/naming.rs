use crate::types::PresetId;
use regex::Regex;
use std::sync::OnceLock;

fn valid_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Letters (plus the Latin-1 accented block), digits, space and a little punctuation.
        Regex::new(r"^[A-Za-zÀ-ÿ0-9 _.,;=()+!-]+$").expect("valid preset name regex")
    })
}

fn numbered_suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.*?) ?\((\d+)\)$").expect("valid numbered suffix regex"))
}

// Leaves room for ` (n)` and the extension under the usual 255-byte file name limit.
pub const MAX_NAME_BYTES: usize = 200;

/// Can `name` be used verbatim as a preset file stem?
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.len() <= MAX_NAME_BYTES && valid_name_re().is_match(name)
}

/// Placeholder used when a preset's own name cannot become a file name.
pub fn placeholder_name(id: PresetId) -> String {
    format!("preset-{id}")
}

/// File stem for a preset: its name when valid, otherwise a generated placeholder.
pub fn file_stem(name: &str, id: PresetId) -> String {
    if is_valid_name(name) {
        name.to_string()
    } else {
        placeholder_name(id)
    }
}

/// Appends the ` (n)` disambiguator used for both file names and imported names.
pub fn with_number(base: &str, n: usize) -> String {
    format!("{base} ({n})")
}

/// Splits a trailing `(<digits>)` off a name.
///
/// Returns the base (with the single separating space removed) and the number,
/// or `None` when the name does not end in `(<digits>)`.
pub fn split_numbered_suffix(name: &str) -> Option<(&str, u32)> {
    let caps = numbered_suffix_re().captures(name)?;
    let base = caps.get(1)?.as_str();
    let n = caps.get(2)?.as_str().parse().ok()?;
    Some((base, n))
}

fn count_containing<'a>(needle: &str, names: impl Iterator<Item = &'a str>) -> usize {
    names.filter(|existing| existing.contains(needle)).count()
}

/// Name an imported preset gets, given the names already in the collection.
///
/// Collisions are counted by substring containment, so `"Melee"` collides
/// with `"Melee (2)"` too. A name that already ends in ` (n)` is renumbered
/// from its stripped base: the new number is how many existing names contain
/// that base.
pub fn resolve_import_name<'a, I>(name: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let existing = existing.into_iter();

    let collisions = count_containing(name, existing.clone());
    if collisions == 0 {
        return name.to_string();
    }

    match split_numbered_suffix(name) {
        Some((base, _)) if !base.trim().is_empty() => {
            with_number(base, count_containing(base, existing))
        }
        _ => with_number(name, collisions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allowed_characters() {
        assert!(is_valid_name("Melee (2)"));
        assert!(is_valid_name("Bossing - Zulrah, v1.2; a=b + c!"));
        assert!(is_valid_name("Café crème"));
    }

    #[test]
    fn rejects_empty_and_path_characters() {
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name("a\\b"));
        assert!(!is_valid_name("what?"));
    }

    #[test]
    fn invalid_names_get_placeholder_stem() {
        let id = PresetId(42);
        assert_eq!(file_stem("Melee", id), "Melee");
        assert_eq!(file_stem("x/y", id), "preset-42");
        assert_eq!(file_stem("", id), "preset-42");
    }

    #[test]
    fn overlong_names_get_placeholder_stem() {
        let id = PresetId(42);
        let at_limit = "x".repeat(MAX_NAME_BYTES);
        assert_eq!(file_stem(&at_limit, id), at_limit);
        assert_eq!(file_stem(&"x".repeat(MAX_NAME_BYTES + 1), id), "preset-42");
        // The limit counts bytes, not characters.
        assert!(!is_valid_name(&"é".repeat(MAX_NAME_BYTES / 2 + 1)));
    }

    #[test]
    fn split_numbered_suffix_handles_spacing_and_digits() {
        assert_eq!(split_numbered_suffix("Melee (2)"), Some(("Melee", 2)));
        assert_eq!(split_numbered_suffix("Melee(12)"), Some(("Melee", 12)));
        assert_eq!(split_numbered_suffix("Melee (a)"), None);
        assert_eq!(split_numbered_suffix("Melee (2) x"), None);
        assert_eq!(split_numbered_suffix("Melee"), None);
    }

    #[test]
    fn unique_import_name_is_kept() {
        assert_eq!(resolve_import_name("Melee", ["Ranged", "Magic"]), "Melee");
    }

    #[test]
    fn import_name_counts_substring_collisions() {
        assert_eq!(resolve_import_name("Melee", ["Melee"]), "Melee (1)");
        assert_eq!(resolve_import_name("Melee", ["Melee", "Melee (1)"]), "Melee (2)");
        assert_eq!(
            resolve_import_name("Melee", ["Melee", "Melee (1)", "Melee setup"]),
            "Melee (3)"
        );
    }

    #[test]
    fn numbered_import_name_is_renumbered_from_base() {
        assert_eq!(
            resolve_import_name("Melee (1)", ["Melee", "Melee (1)"]),
            "Melee (2)"
        );
        // "Melee (7)" collides with nothing, so it is left alone.
        assert_eq!(resolve_import_name("Melee (7)", ["Melee"]), "Melee (7)");
    }

    #[test]
    fn bare_suffix_name_is_numbered_as_a_whole() {
        assert_eq!(resolve_import_name("(3)", ["(3)", "Melee"]), "(3) (1)");
        assert_eq!(resolve_import_name(" (3)", [" (3)"]), " (3) (1)");
    }
}
