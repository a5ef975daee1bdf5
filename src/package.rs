//! The package pipeline: from a [`PackageRequest`] to a rez package on disk.
//!
//! [`Pipeline::create_package`] performs the full conversion:
//!
//! 1. resolve `<output>/<normalized name>/<version>/` and create it
//! 2. refuse to overwrite a package created for a different npm name
//! 3. write `package.py`
//! 4. locate npm (and git for GitHub sources)
//! 5. run the installer selected from the source kind
//!
//! [`Pipeline::extract_package`] only runs the registry install into a directory of the
//! caller's choosing, without a manifest or a versioned layout.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Npm2RezConfig;
use crate::constants::{BIN_DIR, MANIFEST_FILE_NAME, NODE_MODULES_DIR};
use crate::core::{Npm2RezError, PackageRequest, SourceKind};
use crate::exec::{CommandRunner, ExecutableLocator};
use crate::installer::{InstallOutcome, InstallStrategy, RegistryInstaller};
use crate::manifest::{recorded_original_name, write_manifest};
use crate::utils::fs::ensure_dir;
use crate::utils::progress::Spinner;

/// Where a package version lives: `<output root>/<normalized name>/<version>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLayout {
    root: PathBuf,
}

impl PackageLayout {
    /// Layout for `request`. A relative output root is resolved against the current
    /// directory.
    pub fn for_request(request: &PackageRequest) -> Result<Self> {
        let output_root = std::path::absolute(request.output_root()).with_context(|| {
            format!("Failed to resolve output directory: {}", request.output_root().display())
        })?;
        Ok(Self {
            root: output_root.join(request.normalized_name()).join(request.version()),
        })
    }

    /// Create the version directory and its parents. Existing directories are reused.
    pub fn create(&self) -> Result<()> {
        ensure_dir(&self.root)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<output root>/<normalized name>`, holding every version of the package.
    #[must_use]
    pub fn family_dir(&self) -> &Path {
        self.root.parent().unwrap_or(&self.root)
    }

    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE_NAME)
    }

    #[must_use]
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join(BIN_DIR)
    }

    #[must_use]
    pub fn node_modules_dir(&self) -> PathBuf {
        self.root.join(NODE_MODULES_DIR)
    }
}

/// Result of [`Pipeline::create_package`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPackage {
    pub layout: PackageLayout,
    pub outcome: InstallOutcome,
}

/// Runs conversions with an injected [`CommandRunner`].
pub struct Pipeline<R> {
    runner: R,
    locator: ExecutableLocator,
    config: Npm2RezConfig,
}

impl<R: CommandRunner> Pipeline<R> {
    #[must_use]
    pub const fn new(runner: R, locator: ExecutableLocator, config: Npm2RezConfig) -> Self {
        Self {
            runner,
            locator,
            config,
        }
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    /// Convert `request` into a rez package.
    ///
    /// Re-running for the same name and version rewrites the manifest and reinstalls.
    /// Without npm the package is created in degraded mode for either source.
    ///
    /// # Errors
    ///
    /// - [`Npm2RezError::NameCollision`] if another npm name already owns the directory
    /// - [`Npm2RezError::ToolUnavailable`] for a GitHub source with npm but without git
    /// - any installer failure ([`Npm2RezError::CommandFailed`], [`Npm2RezError::CloneFailed`])
    /// - file system errors
    pub async fn create_package(&self, request: &PackageRequest) -> Result<CreatedPackage> {
        let layout = PackageLayout::for_request(request)?;
        check_name_collision(request, layout.family_dir())?;
        layout.create()?;

        write_manifest(request, &self.config.runtime_package, layout.root())?;

        let npm = self.locator.locate(&self.config.registry_tool, &self.runner).await;
        let git = match request.source() {
            SourceKind::Github => self.locator.find(&self.config.vcs_tool),
            SourceKind::Npm => None,
        };
        let strategy = InstallStrategy::for_request(request, npm, git)?;

        let spinner = Spinner::new(self.config.show_progress);
        let result = strategy.install(&self.runner, request, layout.root(), &spinner).await;
        spinner.finish_and_clear();
        let outcome = result?;

        tracing::info!("Package {} {} at {}", request.spec(), outcome, layout.root().display());
        Ok(CreatedPackage {
            layout,
            outcome,
        })
    }

    /// Install the registry release of `request` into `target_dir`.
    ///
    /// Returns `Ok(false)` when npm itself fails (the failure is logged), `Ok(true)` for
    /// a completed or degraded install. A GitHub source is extracted from the registry.
    ///
    /// # Errors
    ///
    /// File system errors are still returned.
    pub async fn extract_package(&self, request: &PackageRequest, target_dir: &Path) -> Result<bool> {
        if request.source() == SourceKind::Github {
            tracing::warn!(
                "Extracting {} from the npm registry; GitHub sources are only built by `create`",
                request.spec()
            );
        }

        let npm = self.locator.locate(&self.config.registry_tool, &self.runner).await;
        let installer = RegistryInstaller::new(npm);

        let spinner = Spinner::new(self.config.show_progress);
        let result = installer.install(&self.runner, request, target_dir, &spinner).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => {
                tracing::debug!("Extracted {} ({})", request.spec(), outcome);
                Ok(true)
            }
            Err(e) if is_tool_failure(&e) => {
                tracing::error!("Failed to extract {}: {:#}", request.spec(), e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

fn is_tool_failure(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<Npm2RezError>(),
        Some(
            Npm2RezError::CommandFailed { .. }
                | Npm2RezError::CloneFailed { .. }
                | Npm2RezError::CommandTimedOut { .. }
        )
    )
}

/// Fail if `family_dir` holds a version whose manifest records another npm name.
///
/// `a-b` and `a_b` normalize to the same rez name; without this check the second
/// conversion would silently replace the first package's manifest.
fn check_name_collision(request: &PackageRequest, family_dir: &Path) -> Result<()> {
    let Ok(entries) = fs::read_dir(family_dir) else {
        return Ok(());
    };

    for entry in entries.flatten() {
        let manifest = entry.path().join(MANIFEST_FILE_NAME);
        let Ok(content) = fs::read_to_string(&manifest) else {
            continue;
        };
        if let Some(existing) = recorded_original_name(&content)
            && existing != request.name()
        {
            return Err(Npm2RezError::NameCollision {
                normalized: request.normalized_name(),
                existing,
                requested: request.name().to_string(),
            }
            .into());
        }
    }

    Ok(())
}
