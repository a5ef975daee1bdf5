//! Building a tagged GitHub release from source.
//!
//! The release is cloned into a temporary sibling of the package directory, so the clone
//! and the package live on the same file system and the copy never crosses devices:
//!
//! ```text
//! rez-packages/typescript/
//! ├── 4.9.5/                 <- install_path
//! └── temp_repo-Xa81Kq/      <- clone, removed when the install finishes
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::InstallOutcome;
use crate::constants::{BUILD_SCRIPT, CLONE_DIR_PREFIX, RELEASE_TAG_PREFIX, REPOSITORY_URL_TEMPLATE};
use crate::core::{Npm2RezError, PackageRequest};
use crate::exec::{CommandRunner, ToolCommand};
use crate::utils::fs::{copy_dir, ensure_dir};
use crate::utils::progress::Spinner;

/// Clone URL for an `owner/name` repository identifier.
///
/// ```rust
/// use npm2rez::installer::repository_url;
///
/// assert_eq!(repository_url("microsoft/TypeScript"), "https://github.com/microsoft/TypeScript.git");
/// ```
#[must_use]
pub fn repository_url(repo: &str) -> String {
    REPOSITORY_URL_TEMPLATE.replace("{repo}", repo)
}

/// Tag expected for a release: the version prefixed with `v`.
#[must_use]
pub fn release_tag(version: &str) -> String {
    format!("{RELEASE_TAG_PREFIX}{version}")
}

/// Clones, builds and copies a GitHub release.
#[derive(Debug, Clone)]
pub struct VcsInstaller {
    npm: PathBuf,
    git: PathBuf,
}

impl VcsInstaller {
    #[must_use]
    pub const fn new(npm: PathBuf, git: PathBuf) -> Self {
        Self {
            npm,
            git,
        }
    }

    /// Clone `v<version>` of the request's repository, run `npm install` and
    /// `npm run build` in the clone, then merge the clone into `install_path`.
    ///
    /// The clone directory is removed whether or not the install succeeds.
    ///
    /// # Errors
    ///
    /// - [`Npm2RezError::CloneFailed`] when the repository or tag does not exist
    /// - [`Npm2RezError::CommandFailed`] when `npm install` or the build fails
    /// - [`Npm2RezError::MissingRepository`] when the request has no repository
    pub async fn install<R: CommandRunner>(
        &self,
        runner: &R,
        request: &PackageRequest,
        install_path: &Path,
        progress: &Spinner,
    ) -> Result<InstallOutcome> {
        let repo = request.repo().ok_or(Npm2RezError::MissingRepository)?;
        ensure_dir(install_path)?;

        let parent = install_path.parent().unwrap_or(install_path);
        let clone_dir = tempfile::Builder::new()
            .prefix(CLONE_DIR_PREFIX)
            .tempdir_in(parent)
            .with_context(|| format!("Failed to create clone directory in {}", parent.display()))?;
        tracing::debug!("Cloning into {}", clone_dir.path().display());

        let result = self.build_and_copy(runner, request, repo, clone_dir.path(), install_path, progress).await;

        let clone_path = clone_dir.path().to_path_buf();
        if let Err(e) = clone_dir.close() {
            tracing::warn!("Failed to remove clone directory {}: {}", clone_path.display(), e);
        }

        result.with_context(|| format!("Failed to install {} from GitHub ({repo})", request.spec()))?;

        tracing::info!("Installed {} from GitHub", request.spec());
        Ok(InstallOutcome::Installed)
    }

    async fn build_and_copy<R: CommandRunner>(
        &self,
        runner: &R,
        request: &PackageRequest,
        repo: &str,
        clone_dir: &Path,
        install_path: &Path,
        progress: &Spinner,
    ) -> Result<()> {
        let url = repository_url(repo);
        let tag = release_tag(request.version());
        let context = request.spec();

        progress.set_message(format!("Cloning {repo} at {tag}"));
        runner
            .run(ToolCommand::git_clone_tag(&self.git, &url, &tag, clone_dir).with_context(context.clone()))
            .await?;

        progress.set_message(format!("Installing dependencies of {repo}"));
        runner
            .run(ToolCommand::npm_install(&self.npm).current_dir(clone_dir).with_context(context.clone()))
            .await?;

        progress.set_message(format!("Building {repo}"));
        runner
            .run(
                ToolCommand::npm_run(&self.npm, BUILD_SCRIPT)
                    .current_dir(clone_dir)
                    .with_context(context),
            )
            .await?;

        copy_dir(clone_dir, install_path)
    }
}
