//! Populating a package directory with npm content.
//!
//! Two installers exist, selected by [`InstallStrategy::for_request`] from the request's
//! [`SourceKind`]:
//!
//! - [`RegistryInstaller`] runs `npm install <name>@<version>` inside the package directory
//!   and exposes `node_modules/.bin` entries under `bin/`
//! - [`VcsInstaller`] clones the `v<version>` tag of a GitHub repository next to the
//!   package directory, builds it with npm and copies the result in
//!
//! # Degraded Mode
//!
//! A registry install without a working npm does not fail. It creates empty `bin/` and
//! `node_modules/` directories and reports [`InstallOutcome::Degraded`], so the package
//! skeleton and manifest still exist and the user is told to install Node.js. The same
//! fallback applies to GitHub sources: without npm nothing is cloned or built.

pub mod registry;
pub mod vcs;

pub use registry::RegistryInstaller;
pub use vcs::{VcsInstaller, release_tag, repository_url};

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::{BIN_DIR, NODE_MODULES_DIR};
use crate::core::{Npm2RezError, PackageRequest, SourceKind};
use crate::exec::CommandRunner;
use crate::utils::fs::ensure_dir;
use crate::utils::progress::Spinner;

/// How an install finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// npm ran and the package contents are in place
    Installed,
    /// npm was unavailable; only empty `bin/` and `node_modules/` were created
    Degraded,
}

impl InstallOutcome {
    #[must_use]
    pub const fn is_degraded(self) -> bool {
        matches!(self, Self::Degraded)
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => write!(f, "installed"),
            Self::Degraded => write!(f, "degraded"),
        }
    }
}

/// The installer chosen for a request.
#[derive(Debug, Clone)]
pub enum InstallStrategy {
    Registry(RegistryInstaller),
    Vcs(VcsInstaller),
    /// npm is unavailable: only the package skeleton is created, whatever the source
    Placeholder,
}

impl InstallStrategy {
    /// Pick the installer for `request` given the located tools.
    ///
    /// Without npm every source falls back to [`InstallStrategy::Placeholder`].
    ///
    /// # Errors
    ///
    /// [`Npm2RezError::ToolUnavailable`] for a GitHub source when npm is present but git
    /// is missing.
    pub fn for_request(
        request: &PackageRequest,
        npm: Option<PathBuf>,
        git: Option<PathBuf>,
    ) -> Result<Self> {
        let Some(npm) = npm else {
            return Ok(Self::Placeholder);
        };

        match request.source() {
            SourceKind::Npm => Ok(Self::Registry(RegistryInstaller::new(Some(npm)))),
            SourceKind::Github => {
                let git = git.ok_or_else(|| Npm2RezError::ToolUnavailable {
                    tool: "git".to_string(),
                })?;
                Ok(Self::Vcs(VcsInstaller::new(npm, git)))
            }
        }
    }

    pub async fn install<R: CommandRunner>(
        &self,
        runner: &R,
        request: &PackageRequest,
        install_path: &Path,
        progress: &Spinner,
    ) -> Result<InstallOutcome> {
        match self {
            Self::Registry(installer) => {
                installer.install(runner, request, install_path, progress).await
            }
            Self::Vcs(installer) => installer.install(runner, request, install_path, progress).await,
            Self::Placeholder => {
                ensure_dir(install_path)?;
                install_placeholder(install_path)
            }
        }
    }
}

/// Create the empty `bin/` and `node_modules/` directories of a degraded install and
/// tell the user npm is missing.
pub fn install_placeholder(install_path: &Path) -> Result<InstallOutcome> {
    tracing::warn!(
        "npm command not found. Package files will be created but Node.js packages won't be installed."
    );
    tracing::warn!("Please install Node.js and npm to enable package installation.");
    ensure_dir(&install_path.join(BIN_DIR))?;
    ensure_dir(&install_path.join(NODE_MODULES_DIR))?;
    Ok(InstallOutcome::Degraded)
}
