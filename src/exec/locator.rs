//! Finding usable executables.
//!
//! A tool counts as available only if it is found on the search path **and** answers
//! `--version` successfully. A broken npm shim on `PATH` is therefore treated the same as
//! no npm at all.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::{CommandRunner, ToolCommand};

/// Looks up executables on an explicit search path.
///
/// When no search path is configured the process `PATH` is used. On Windows, `which`
/// also tries the `PATHEXT` extensions, so `npm` resolves to `npm.cmd`.
#[derive(Debug, Clone)]
pub struct ExecutableLocator {
    search_path: Option<OsString>,
    cwd: PathBuf,
}

impl ExecutableLocator {
    /// Locator resolving relative search path entries against the current directory.
    pub fn new(search_path: Option<OsString>) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Ok(Self::with_cwd(search_path, cwd))
    }

    pub fn with_cwd(search_path: Option<OsString>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            search_path,
            cwd: cwd.into(),
        }
    }

    /// Path of `name` on the search path, without running it.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let paths = self.search_path.clone().or_else(|| std::env::var_os("PATH"));
        match which::which_in(name, paths, &self.cwd) {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::debug!("{} not found on search path: {}", name, e);
                None
            }
        }
    }

    /// Path of `name` if it is on the search path and `<path> --version` succeeds.
    pub async fn locate<R: CommandRunner>(&self, name: &str, runner: &R) -> Option<PathBuf> {
        let path = self.find(name)?;
        if answers_version(&path, runner).await {
            tracing::debug!("Using {} at {}", name, path.display());
            Some(path)
        } else {
            None
        }
    }
}

async fn answers_version<R: CommandRunner>(path: &Path, runner: &R) -> bool {
    match runner.run(ToolCommand::version_check(path)).await {
        Ok(output) => {
            tracing::debug!("{} --version: {}", path.display(), output.stdout.trim());
            true
        }
        Err(e) => {
            tracing::debug!("{} --version failed: {}", path.display(), e);
            false
        }
    }
}
