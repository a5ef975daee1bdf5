//! Command-line interface for npm2rez
//!
//! # Commands
//!
//! - `create` - convert a package into `<output>/<name>/<version>/` with a `package.py`
//! - `extract` - install a registry release into a plain directory
//!
//! # Global Options
//!
//! - `--verbose` - debug output
//! - `--quiet` - only warnings and errors
//! - `--no-progress` - no spinner while npm and git run
//! - `--config <path>` - configuration file (also `NPM2REZ_CONFIG`)
//!
//! # Examples
//!
//! ```bash
//! npm2rez create --name @types/node --version 18.11.9
//! npm2rez create --name typescript --version 4.9.5 --bin-name tsc --output ~/packages
//! npm2rez create --name typescript --version 4.9.5 --source github --repo microsoft/TypeScript
//! npm2rez --no-progress extract --name eslint --version 8.40.0 --output ./vendor
//! ```
//!
//! Errors are printed as `Error: <message>` on stderr, with details and a suggestion
//! where one applies. The exit status is 0 even when a command fails; usage errors
//! reported by the argument parser are the exception.

mod create;
mod extract;


pub use create::CreateCommand;
pub use extract::ExtractCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{CONFIG_ENV_VAR, Npm2RezConfig};
use crate::exec::{ExecutableLocator, SystemRunner};
use crate::package::Pipeline;

/// Settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and embedders can run commands without parsing
/// arguments or touching the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: Option<String>,
    /// Disable the spinner regardless of the configuration file
    pub no_progress: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` takes precedence over the level chosen by `--verbose`/`--quiet`.
    /// Calling this more than once is harmless.
    pub fn init_logging(&self) {
        let level = self.log_level.as_deref().unwrap_or("info");
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Convert npm packages into rez packages.
#[derive(Parser, Debug)]
#[command(
    name = "npm2rez",
    about = "Convert Node.js packages into rez packages",
    version,
    author,
    long_about = "npm2rez installs a package from the npm registry (or builds a tagged GitHub release) \
                  into a versioned rez package directory with a generated package.py."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output, including every command run
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable the progress spinner
    #[arg(long, global = true)]
    no_progress: bool,

    /// Path to the configuration file
    #[arg(long, global = true, env = CONFIG_ENV_VAR, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a rez package from an npm package or a GitHub release
    Create(CreateCommand),

    /// Install an npm package into a directory without creating a rez package
    Extract(ExtractCommand),
}

impl Cli {
    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            no_progress: self.no_progress,
            config_path: self.config.clone(),
        }
    }

    /// Run the parsed command with an explicit [`CliConfig`].
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let mut settings = Npm2RezConfig::load(config.config_path.as_deref()).await?;
        if config.no_progress {
            settings.show_progress = false;
        }

        let runner = SystemRunner::new(settings.command_timeout());
        let locator = ExecutableLocator::new(settings.search_path())?;
        let pipeline = Pipeline::new(runner, locator, settings);

        match self.command {
            Commands::Create(cmd) => cmd.execute(&pipeline).await,
            Commands::Extract(cmd) => cmd.execute(&pipeline).await,
        }
    }
}
