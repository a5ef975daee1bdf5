//! Atomic file writes.
//!
//! Content is written to a sibling `.tmp` file, synced, then renamed over the target, so
//! a crash never leaves a half-written `package.py` behind.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

use super::dirs::ensure_dir;
use crate::utils::platform::is_windows;

/// Atomically write a string to a file, creating parent directories.
pub fn safe_write(path: &Path, content: &str) -> Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically write bytes to a file, creating parent directories.
///
/// # Errors
///
/// Fails when the parent directory cannot be created or the temp file cannot be written
/// or renamed.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    {
        let mut file = fs::File::create(&temp_path).with_context(|| {
            let platform_help = if is_windows() {
                "On Windows: Check file permissions, path length, and that directory exists"
            } else {
                "Check file permissions and that directory exists"
            };

            format!("Failed to create temp file: {}\n\n{}", temp_path.display(), platform_help)
        })?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;

        file.sync_all().with_context(|| "Failed to sync file to disk")?;
    }

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temp file to: {}", path.display()))?;

    Ok(())
}

/// Serialize `data` as pretty JSON (with a trailing newline) and write it atomically.
pub fn write_json_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: serde::Serialize,
{
    let mut json = serde_json::to_string_pretty(data)
        .with_context(|| format!("Failed to serialize JSON for: {}", path.display()))?;
    json.push('\n');

    safe_write(path, &json).with_context(|| format!("Failed to write JSON file: {}", path.display()))
}
