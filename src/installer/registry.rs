//! Installing a published release from the npm registry.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::{InstallOutcome, install_placeholder};
use crate::constants::{
    BIN_DIR, NODE_MODULES_BIN_DIR, NODE_MODULES_DIR, PROJECT_DESCRIPTOR_FILE,
    PROJECT_DESCRIPTOR_NAME,
};
use crate::core::PackageRequest;
use crate::exec::{CommandRunner, ToolCommand};
use crate::utils::fs::{ensure_dir, link_or_copy, write_json_file};
use crate::utils::progress::Spinner;

/// The throwaway `package.json` that makes npm install locally instead of into a parent
/// project or globally.
#[derive(Debug, Serialize)]
struct ProjectDescriptor<'a> {
    name: &'a str,
    version: &'a str,
    private: bool,
}

impl Default for ProjectDescriptor<'_> {
    fn default() -> Self {
        Self {
            name: PROJECT_DESCRIPTOR_NAME,
            version: "1.0.0",
            private: true,
        }
    }
}

/// Installs `name@version` from the registry into a directory.
#[derive(Debug, Clone)]
pub struct RegistryInstaller {
    npm: Option<PathBuf>,
}

impl RegistryInstaller {
    /// `npm` is the located and version-checked executable; `None` selects degraded mode.
    #[must_use]
    pub const fn new(npm: Option<PathBuf>) -> Self {
        Self {
            npm,
        }
    }

    /// Install the package into `install_path`.
    ///
    /// Afterwards `install_path` holds `package.json`, `node_modules/` and a `bin/`
    /// directory exposing every `node_modules/.bin` entry (symlinks on Unix, copies on
    /// Windows).
    ///
    /// # Errors
    ///
    /// A failing `npm install` is returned as
    /// [`Npm2RezError::CommandFailed`](crate::core::Npm2RezError::CommandFailed). A missing npm
    /// is not an error; see [`InstallOutcome::Degraded`].
    pub async fn install<R: CommandRunner>(
        &self,
        runner: &R,
        request: &PackageRequest,
        install_path: &Path,
        progress: &Spinner,
    ) -> Result<InstallOutcome> {
        ensure_dir(install_path)?;

        let Some(npm) = &self.npm else {
            return install_placeholder(install_path);
        };

        write_json_file(&install_path.join(PROJECT_DESCRIPTOR_FILE), &ProjectDescriptor::default())?;

        let spec = request.spec();
        progress.set_message(format!("Installing {spec} from npm"));
        runner
            .run(
                ToolCommand::npm_install_exact(npm, &spec)
                    .current_dir(install_path)
                    .with_context(spec.clone()),
            )
            .await
            .with_context(|| format!("Failed to install {spec} from the npm registry"))?;

        let linked = link_executables(install_path)?;
        tracing::debug!("Exposed {} executable(s) under {}", linked, BIN_DIR);

        if let Some(bin_name) = request.bin_name()
            && !install_path.join(BIN_DIR).join(bin_name).exists()
        {
            tracing::warn!(
                "{} does not provide an executable named '{}'; PATH will still include {}/",
                spec,
                bin_name,
                BIN_DIR
            );
        }

        tracing::info!("Installed {} from npm", spec);
        Ok(InstallOutcome::Installed)
    }
}

/// Expose every entry of `node_modules/.bin` under `bin/`. Returns the number of entries.
fn link_executables(install_path: &Path) -> Result<usize> {
    let bin_dir = install_path.join(BIN_DIR);
    ensure_dir(&bin_dir)?;

    let node_bin_dir = install_path.join(NODE_MODULES_DIR).join(NODE_MODULES_BIN_DIR);
    if !node_bin_dir.is_dir() {
        return Ok(0);
    }

    let mut count = 0;
    for entry in fs::read_dir(&node_bin_dir)
        .with_context(|| format!("Failed to read directory: {}", node_bin_dir.display()))?
    {
        let entry = entry?;
        link_or_copy(&entry.path(), &bin_dir.join(entry.file_name()))?;
        count += 1;
    }
    Ok(count)
}
