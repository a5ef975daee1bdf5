//! Running external tools.
//!
//! Every process npm2rez starts is described by a [`ToolCommand`] and executed by a
//! [`CommandRunner`]. The production runner is [`SystemRunner`], which spawns the process
//! with `tokio::process`. Tests substitute a runner that records commands instead of
//! running them, so installers can be exercised without npm, git or the network.
//!
//! # Examples
//!
//! ```rust,no_run
//! use npm2rez::exec::{CommandRunner, SystemRunner, ToolCommand};
//! use std::path::Path;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let runner = SystemRunner::new(None);
//! let install = ToolCommand::npm_install_exact(Path::new("/usr/bin/npm"), "typescript@4.9.5")
//!     .current_dir("/tmp/rez/typescript/4.9.5");
//! runner.run(install).await?;
//! # Ok(())
//! # }
//! ```

pub mod locator;

pub use locator::ExecutableLocator;

use anyhow::{Context, Result};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use crate::core::Npm2RezError;

/// A single invocation of an external tool.
///
/// Built with the constructors for the commands npm2rez needs
/// ([`ToolCommand::npm_install_exact`], [`ToolCommand::git_clone_tag`], ...) and refined with
/// [`ToolCommand::current_dir`]. The working directory is always explicit; the process
/// working directory of npm2rez itself is never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    context: Option<String>,
    /// Set for clones so failures can name the repository
    clone_url: Option<String>,
}

impl ToolCommand {
    /// A command running `program` with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            context: None,
            clone_url: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Working directory of the spawned process.
    #[must_use]
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Label prefixed to the log lines of this command, usually `name@version`.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// `<program> --version`, used to check that a located executable actually runs.
    pub fn version_check(program: &Path) -> Self {
        Self::new(program).arg("--version")
    }

    /// `npm install <spec> --save --save-exact`
    pub fn npm_install_exact(npm: &Path, spec: &str) -> Self {
        Self::new(npm).args(["install", spec, "--save", "--save-exact"])
    }

    /// `npm install` for the dependencies of the project in the working directory.
    pub fn npm_install(npm: &Path) -> Self {
        Self::new(npm).arg("install")
    }

    /// `npm run <script>`
    pub fn npm_run(npm: &Path, script: &str) -> Self {
        Self::new(npm).args(["run", script])
    }

    /// `git clone --depth 1 --branch <tag> <url> <target>`
    pub fn git_clone_tag(git: &Path, url: &str, tag: &str, target: &Path) -> Self {
        let mut cmd = Self::new(git).args(["clone", "--depth", "1", "--branch", tag, url]);
        cmd.args.push(target.display().to_string());
        cmd.clone_url = Some(url.to_string());
        cmd
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Short tool name, e.g. `npm` for `/usr/local/bin/npm` or `C:\...\npm.cmd`.
    #[must_use]
    pub fn program_name(&self) -> String {
        self.program
            .file_stem()
            .map_or_else(|| self.program.display().to_string(), |s| s.to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn working_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    #[must_use]
    pub fn clone_url(&self) -> Option<&str> {
        self.clone_url.as_deref()
    }

    /// The subcommand, used in error messages: `install`, `run build`, `clone`, `--version`.
    #[must_use]
    pub fn operation(&self) -> String {
        match self.args.as_slice() {
            [] => "unknown".to_string(),
            [first, second, ..] if first == "run" => format!("run {second}"),
            [first, ..] => first.clone(),
        }
    }

    fn is_clone(&self) -> bool {
        self.args.first().is_some_and(|a| a == "clone")
    }

    /// Error describing a non-zero exit of this command.
    #[must_use]
    pub fn failure(&self, stdout: &str, stderr: &str) -> Npm2RezError {
        let output = if stderr.trim().is_empty() {
            stdout
        } else {
            stderr
        };

        if self.is_clone() {
            Npm2RezError::CloneFailed {
                url: self.clone_url.clone().unwrap_or_else(|| "unknown".to_string()),
                reason: output.to_string(),
            }
        } else {
            Npm2RezError::CommandFailed {
                program: self.program_name(),
                operation: self.operation(),
                stderr: output.to_string(),
            }
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program_name())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured output of a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes [`ToolCommand`]s.
///
/// Implementations must report a non-zero exit status as an error (see
/// [`ToolCommand::failure`]) so callers only ever see successful output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: ToolCommand) -> impl Future<Output = Result<CommandOutput>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner; `None` means commands may run indefinitely.
    #[must_use]
    pub const fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
        }
    }
}

impl CommandRunner for SystemRunner {
    async fn run(&self, command: ToolCommand) -> Result<CommandOutput> {
        let start = std::time::Instant::now();
        let mut cmd = Command::new(command.program());
        cmd.args(command.arguments())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = command.working_dir() {
            cmd.current_dir(dir);
        }

        let label = command.context.as_deref().map(|c| format!("({c}) ")).unwrap_or_default();
        match command.working_dir() {
            Some(dir) => tracing::debug!(
                target: "exec",
                "{}Executing command: {} (in {})",
                label,
                command,
                dir.display()
            ),
            None => tracing::debug!(target: "exec", "{}Executing command: {}", label, command),
        }

        let output_future = cmd.output();
        let output = if let Some(duration) = self.timeout {
            if let Ok(result) = timeout(duration, output_future).await {
                result.with_context(|| format!("Failed to execute {command}"))?
            } else {
                tracing::warn!(
                    target: "exec",
                    "{}Command timed out after {} seconds: {}",
                    label,
                    duration.as_secs(),
                    command
                );
                return Err(Npm2RezError::CommandTimedOut {
                    program: command.program_name(),
                    operation: command.operation(),
                    seconds: duration.as_secs(),
                }
                .into());
            }
        } else {
            output_future.await.with_context(|| format!("Failed to execute {command}"))?
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            tracing::debug!(
                target: "exec",
                "{}Command failed with exit code: {:?}",
                label,
                output.status.code()
            );
            if !stderr.is_empty() {
                tracing::debug!(target: "exec", "{}Error: {}", label, stderr.trim());
            }
            return Err(command.failure(&stdout, &stderr).into());
        }

        if !stdout.is_empty() {
            tracing::debug!(target: "exec", "{}{}", label, stdout.trim());
        }
        if !stderr.is_empty() {
            tracing::debug!(target: "exec", "{}{}", label, stderr.trim());
        }

        let elapsed = start.elapsed();
        if elapsed.as_secs() > 1 {
            tracing::info!(
                target: "exec::perf",
                "{}{} {} took {:.2}s",
                label,
                command.program_name(),
                command.operation(),
                elapsed.as_secs_f64()
            );
        }

        Ok(CommandOutput {
            stdout,
            stderr,
        })
    }
}
