use std::fs;
use std::path::Path;

use anyhow::Context;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create dir: {}", path.display()))
}

/// Removes every entry of `dir`, files and subdirectories alike.
pub fn clear_dir(dir: &Path) -> anyhow::Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read dir: {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read dir: {}", dir.display()))?;
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let res = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        res.with_context(|| format!("failed to remove: {}", path.display()))?;
    }
    Ok(())
}

/// Moves `tmp` over `dst`.
///
/// Platforms whose rename refuses an existing target get `dst` removed
/// first. `tmp` is cleaned up when the move fails.
pub fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let moved = fs::rename(tmp, dst).or_else(|first| {
        if !dst.exists() {
            return Err(first);
        }
        fs::remove_file(dst).and_then(|()| fs::rename(tmp, dst))
    });
    if moved.is_err() {
        let _ = fs::remove_file(tmp);
    }
    moved.with_context(|| format!("move {} -> {}", tmp.display(), dst.display()))
}

/// Write JSON to a temp file next to `dst`, then swap it in.
pub fn write_json_atomic<T: serde::Serialize>(dst: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_vec_pretty(value).context("encode JSON")?;
    let tmp = dst.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write temp: {}", tmp.display()))?;
    replace_file(&tmp, dst).with_context(|| format!("replace file: {}", dst.display()))
}
