//! Directory operations: creating and merging trees, exposing executables.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::utils::platform::is_windows;

/// Ensures a directory exists, creating it and all parent directories if necessary.
///
/// # Errors
///
/// Fails if the path exists but is not a directory, or creation fails.
///
/// # Examples
///
/// ```rust,no_run
/// use npm2rez::utils::fs::ensure_dir;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// ensure_dir(Path::new("rez-packages/typescript/4.9.5/bin"))?;
/// # Ok(())
/// # }
/// ```
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).with_context(|| {
            let platform_help = if is_windows() {
                "On Windows: Check that the path length is < 260 chars or that long path support is enabled"
            } else {
                "Check directory permissions and path validity"
            };

            format!("Failed to create directory: {}\n\n{}", path.display(), platform_help)
        })?;
    } else if !path.is_dir() {
        return Err(anyhow::anyhow!("Path exists but is not a directory: {}", path.display()));
    }
    Ok(())
}

/// Recursively merges the contents of `src` into `dst`.
///
/// - Destination directories are created as needed and existing ones are merged into
/// - Regular files overwrite existing files of the same name
/// - Symlinks are recreated pointing at the same target (copied as files on Windows)
///
/// Other entry types are skipped.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    ensure_dir(dst)?;

    for entry in
        fs::read_dir(src).with_context(|| format!("Failed to read directory: {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if file_type.is_dir() {
            copy_dir(&src_path, &dst_path)?;
        } else if file_type.is_file() {
            fs::copy(&src_path, &dst_path).with_context(|| {
                format!("Failed to copy file from {} to {}", src_path.display(), dst_path.display())
            })?;
        } else if file_type.is_symlink() {
            copy_symlink(&src_path, &dst_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    let target = fs::read_link(src)
        .with_context(|| format!("Failed to read symlink: {}", src.display()))?;
    remove_entry(dst)?;
    std::os::unix::fs::symlink(&target, dst)
        .with_context(|| format!("Failed to create symlink: {}", dst.display()))
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<()> {
    if src.is_dir() {
        copy_dir(src, dst)
    } else if src.exists() {
        fs::copy(src, dst).with_context(|| {
            format!("Failed to copy file from {} to {}", src.display(), dst.display())
        })?;
        Ok(())
    } else {
        // dangling link
        tracing::debug!("Skipping dangling symlink: {}", src.display());
        Ok(())
    }
}

/// Expose `src` at `dst`: a symlink on Unix, a copy elsewhere.
///
/// Any existing entry at `dst` (file, symlink or directory) is removed first, so relinking
/// after a reinstall always succeeds.
pub fn link_or_copy(src: &Path, dst: &Path) -> Result<()> {
    remove_entry(dst)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(src, dst).with_context(|| {
            format!("Failed to link {} to {}", dst.display(), src.display())
        })?;
    }

    #[cfg(not(unix))]
    {
        if src.is_dir() {
            copy_dir(src, dst)?;
        } else {
            fs::copy(src, dst).with_context(|| {
                format!("Failed to copy file from {} to {}", src.display(), dst.display())
            })?;
        }
    }

    Ok(())
}

/// Remove whatever is at `path` without following symlinks. Missing paths are fine.
fn remove_entry(path: &Path) -> Result<()> {
    let Ok(metadata) = fs::symlink_metadata(path) else {
        return Ok(());
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
    .with_context(|| format!("Failed to remove existing entry: {}", path.display()))
}
