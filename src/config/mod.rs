//! User configuration for npm2rez
//!
//! npm2rez runs with sensible defaults and needs no configuration. A TOML file can
//! override which tools are used and how they are run.
//!
//! # Location
//!
//! 1. `--config <path>` or the `NPM2REZ_CONFIG` environment variable (must exist)
//! 2. Otherwise the default location, if present:
//!    - Unix/macOS: `~/.npm2rez/config.toml`
//!    - Windows: `%LOCALAPPDATA%\npm2rez\config.toml`
//!
//! # Format
//!
//! ```toml
//! # Executable located for registry installs and builds
//! registry_tool = "npm"
//!
//! # Executable used to clone GitHub sources
//! vcs_tool = "git"
//!
//! # rez package named in `requires` (as `<runtime_package>-<node-version>+`)
//! runtime_package = "nodejs"
//!
//! # Search these directories instead of PATH (platform path-list syntax)
//! search_path = "/opt/node/bin:/usr/bin"
//!
//! # Abort any external command running longer than this
//! command_timeout_secs = 900
//!
//! # Show a spinner while npm and git run
//! show_progress = true
//! ```
//!
//! Every key is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::core::Npm2RezError;
use crate::utils::platform::get_home_dir;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "NPM2REZ_CONFIG";

/// Settings loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Npm2RezConfig {
    pub registry_tool: String,
    pub vcs_tool: String,
    pub runtime_package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
    pub show_progress: bool,
}

impl Default for Npm2RezConfig {
    fn default() -> Self {
        Self {
            registry_tool: "npm".to_string(),
            vcs_tool: "git".to_string(),
            runtime_package: "nodejs".to_string(),
            search_path: None,
            command_timeout_secs: None,
            show_progress: true,
        }
    }
}

impl Npm2RezConfig {
    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used when the
    /// file is present and the built-in defaults otherwise.
    ///
    /// # Errors
    ///
    /// - [`Npm2RezError::ConfigNotFound`] for a missing explicit file
    /// - [`Npm2RezError::TomlError`] or [`Npm2RezError::ConfigError`] for invalid content
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Npm2RezError::ConfigNotFound {
                    path: path.display().to_string(),
                }
                .into());
            }
            return Self::load_from(path).await;
        }

        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from(&path).await,
            Ok(_) => Ok(Self::default()),
            Err(e) => {
                tracing::debug!("No default config location: {}", e);
                Ok(Self::default())
            }
        }
    }

    /// Load and validate the configuration at `path`.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .map_err(Npm2RezError::from)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        config.validate()?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("npm2rez")
        } else {
            get_home_dir()?.join(".npm2rez")
        };

        Ok(config_dir.join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("registry_tool", &self.registry_tool),
            ("vcs_tool", &self.vcs_tool),
            ("runtime_package", &self.runtime_package),
        ] {
            if value.trim().is_empty() {
                return Err(Npm2RezError::ConfigError {
                    message: format!("`{key}` must not be empty"),
                }
                .into());
            }
        }

        if self.command_timeout_secs == Some(0) {
            return Err(Npm2RezError::ConfigError {
                message: "`command_timeout_secs` must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Timeout applied to every external command, if configured.
    #[must_use]
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    /// Explicit executable search path, if configured.
    #[must_use]
    pub fn search_path(&self) -> Option<OsString> {
        self.search_path.as_ref().map(OsString::from)
    }
}
