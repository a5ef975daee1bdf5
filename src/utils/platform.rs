//! Platform helpers: OS detection, home directory and path resolution.
//!
//! # Examples
//!
//! ```rust,no_run
//! use npm2rez::utils::platform::{is_windows, resolve_path};
//!
//! # fn example() -> anyhow::Result<()> {
//! let output = resolve_path("~/rez-packages")?;
//! assert!(output.is_absolute());
//!
//! if is_windows() {
//!     println!("executables are copied, not symlinked");
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Whether npm2rez is running on Windows.
///
/// On Windows the entries of `node_modules/.bin` are copied instead of symlinked.
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(windows)
}

/// Home directory of the current user.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        let platform_help = if is_windows() {
            "On Windows: Check that the USERPROFILE environment variable is set"
        } else {
            "On Unix/Linux: Check that the HOME environment variable is set"
        };
        anyhow::anyhow!("Could not determine home directory.\n\n{platform_help}")
    })
}

/// Expand `~` and environment variables in a user-supplied path and make it absolute.
///
/// The path is not required to exist and symlinks are not resolved, so the result is
/// what the user would expect to see printed back.
///
/// # Errors
///
/// Fails when the path references an undefined environment variable or the current
/// directory cannot be determined.
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| {
        let platform_vars = if is_windows() {
            "Common Windows variables: $USERPROFILE, $APPDATA, $TEMP"
        } else {
            "Common Unix variables: $HOME, $USER, $TMPDIR"
        };
        format!("Failed to expand path: {path}\n\n{platform_vars}")
    })?;

    std::path::absolute(expanded.as_ref())
        .with_context(|| format!("Failed to make path absolute: {expanded}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_windows() {
        assert_eq!(is_windows(), cfg!(windows));
    }

    #[test]
    fn test_resolve_relative_path_is_absolute() {
        let resolved = resolve_path("rez-packages").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("rez-packages"));
    }

    #[test]
    fn test_resolve_tilde() {
        let home = get_home_dir().unwrap();
        let resolved = resolve_path("~/rez").unwrap();
        assert_eq!(resolved, home.join("rez"));
    }

    #[test]
    fn test_resolve_undefined_variable_fails() {
        let result = resolve_path("$NPM2REZ_SURELY_UNDEFINED_VARIABLE/out");
        assert!(result.is_err());
    }
}
