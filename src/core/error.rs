//! Error handling for npm2rez
//!
//! This module provides the error types and the user-facing error reporting for the
//! npm2rez pipeline. As everywhere else in the crate, there are two layers:
//!
//! 1. [`Npm2RezError`] - strongly-typed failures raised by the pipeline
//! 2. [`ErrorContext`] - a wrapper adding details and a suggestion for CLI users
//!
//! # Error Categories
//!
//! - **Tools**: [`Npm2RezError::ToolUnavailable`], [`Npm2RezError::CommandFailed`],
//!   [`Npm2RezError::CloneFailed`], [`Npm2RezError::CommandTimedOut`]
//! - **Requests**: [`Npm2RezError::MissingRepository`], [`Npm2RezError::InvalidPackageName`],
//!   [`Npm2RezError::NameCollision`]
//! - **Configuration**: [`Npm2RezError::ConfigError`], [`Npm2RezError::ConfigNotFound`]
//! - **File system**: [`Npm2RezError::FileSystemError`]
//!
//! Only a missing `npm` is recovered locally (degraded mode).
//! Everything else travels up to the CLI, which renders it with [`user_friendly_error`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use npm2rez::core::{Npm2RezError, user_friendly_error};
//!
//! let error = anyhow::Error::from(Npm2RezError::MissingRepository);
//! let context = user_friendly_error(error);
//! context.display(); // Error: When using github source, --repo is required
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// Every failure the npm2rez pipeline reports.
///
/// Variants carry owned strings rather than source errors so they can be cloned into an
/// [`ErrorContext`] after being downcast out of an [`anyhow::Error`].
#[derive(Error, Debug)]
pub enum Npm2RezError {
    /// A required executable could not be found.
    ///
    /// A missing npm is not an error at all: the pipeline falls back to degraded mode. This
    /// is raised for a GitHub source when npm is present but git is not.
    #[error("{tool} is not installed or not found in the executable search path")]
    ToolUnavailable {
        /// Name of the missing tool (e.g. "npm")
        tool: String,
    },

    /// An external command exited with a non-zero status.
    #[error("{program} {operation} failed")]
    CommandFailed {
        /// The program that was run (e.g. "npm")
        program: String,
        /// The operation that failed (e.g. "install", "run build")
        operation: String,
        /// The error output of the command
        stderr: String,
    },

    /// `git clone` failed, usually because the repository or the `v<version>` tag does not exist.
    #[error("Failed to clone repository: {url}")]
    CloneFailed {
        /// The repository URL
        url: String,
        /// The error output of git
        reason: String,
    },

    /// An external command exceeded the configured timeout.
    #[error("{program} {operation} timed out after {seconds} seconds")]
    CommandTimedOut {
        /// The program that was run
        program: String,
        /// The operation that timed out
        operation: String,
        /// The configured timeout
        seconds: u64,
    },

    /// A GitHub source was requested without a repository identifier.
    #[error("When using github source, --repo is required")]
    MissingRepository,

    /// The package name does not map onto a usable rez name.
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName {
        /// The name as given by the user
        name: String,
        /// What is wrong with the normalized name
        reason: String,
    },

    /// Two different npm names map onto the same rez package directory.
    #[error(
        "Package name '{requested}' collides with existing package '{existing}' (both normalize to '{normalized}')"
    )]
    NameCollision {
        /// The shared normalized name
        normalized: String,
        /// The original name recorded in the existing manifest
        existing: String,
        /// The original name of the current request
        requested: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was requested
        path: String,
    },

    /// The manifest template could not be rendered.
    #[error("Failed to render {file}: {reason}")]
    ManifestRender {
        /// Manifest file name
        file: String,
        /// Template engine message
        reason: String,
    },

    /// File system error
    #[error("File system error: {operation}")]
    FileSystemError {
        /// The file system operation that failed
        operation: String,
        /// The path involved
        path: String,
    },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Catch-all with a preformatted message
    #[error("{message}")]
    Other {
        /// The error message
        message: String,
    },
}

impl Clone for Npm2RezError {
    fn clone(&self) -> Self {
        match self {
            Self::ToolUnavailable {
                tool,
            } => Self::ToolUnavailable {
                tool: tool.clone(),
            },
            Self::CommandFailed {
                program,
                operation,
                stderr,
            } => Self::CommandFailed {
                program: program.clone(),
                operation: operation.clone(),
                stderr: stderr.clone(),
            },
            Self::CloneFailed {
                url,
                reason,
            } => Self::CloneFailed {
                url: url.clone(),
                reason: reason.clone(),
            },
            Self::CommandTimedOut {
                program,
                operation,
                seconds,
            } => Self::CommandTimedOut {
                program: program.clone(),
                operation: operation.clone(),
                seconds: *seconds,
            },
            Self::MissingRepository => Self::MissingRepository,
            Self::InvalidPackageName {
                name,
                reason,
            } => Self::InvalidPackageName {
                name: name.clone(),
                reason: reason.clone(),
            },
            Self::NameCollision {
                normalized,
                existing,
                requested,
            } => Self::NameCollision {
                normalized: normalized.clone(),
                existing: existing.clone(),
                requested: requested.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::ManifestRender {
                file,
                reason,
            } => Self::ManifestRender {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::FileSystemError {
                operation,
                path,
            } => Self::FileSystemError {
                operation: operation.clone(),
                path: path.clone(),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// An [`Npm2RezError`] together with optional details and a suggestion.
///
/// This is what the CLI prints when a command fails:
///
/// ```text
/// Error: npm install failed
/// details: npm ERR! 404 Not Found - GET https://registry.npmjs.org/no-such-package
/// suggestion: Check that the package name and version exist on the npm registry
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: Npm2RezError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without details or suggestion.
    #[must_use]
    pub const fn new(error: Npm2RezError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with terminal colors.
    ///
    /// - Error message: red and bold, prefixed with `Error`
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "Error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] suitable for display.
///
/// The error chain is searched for an [`Npm2RezError`] first (so errors wrapped in
/// `.context(...)` still get their tailored suggestion), then for common I/O failures.
/// Anything else is shown with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(npm2rez_error) = error.chain().find_map(|e| e.downcast_ref::<Npm2RezError>()) {
        return create_error_context(npm2rez_error.clone());
    }

    if let Some(io_error) = error.chain().find_map(|e| e.downcast_ref::<std::io::Error>()) {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(Npm2RezError::FileSystemError {
                    operation: "file access".to_string(),
                    path: error.to_string(),
                })
                .with_suggestion("Check the permissions of the output directory")
                .with_details(
                    "npm2rez needs write access to the output directory and its parent",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(Npm2RezError::FileSystemError {
                    operation: "file access".to_string(),
                    path: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(Npm2RezError::Other {
        message,
    })
}

fn create_error_context(error: Npm2RezError) -> ErrorContext {
    match &error {
        Npm2RezError::ToolUnavailable {
            tool,
        } => {
            let suggestion =
                format!("Install {tool} or set `search_path` in the npm2rez config");
            ErrorContext::new(error).with_suggestion(suggestion).with_details(
                "GitHub sources are cloned with git before they are built with npm",
            )
        }

        Npm2RezError::CommandFailed {
            operation,
            stderr,
            ..
        } => {
            let suggestion = match operation.as_str() {
                "install" => "Check that the package name and version exist on the npm registry",
                op if op.starts_with("run") => {
                    "The repository's build script failed. Try building the tag manually"
                }
                _ => "Run the command manually with --verbose for more details",
            };
            let details = stderr.trim().to_string();
            let context = ErrorContext::new(error).with_suggestion(suggestion);
            if details.is_empty() {
                context
            } else {
                context.with_details(details)
            }
        }

        Npm2RezError::CloneFailed {
            url,
            reason,
        } => {
            let suggestion = format!(
                "Verify that {url} exists and has a tag named v<version> for the requested version"
            );
            let details = reason.trim().to_string();
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }

        Npm2RezError::CommandTimedOut {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Increase `command_timeout_secs` in the npm2rez config or remove it")
            .with_details("The external tool did not finish within the configured timeout"),

        Npm2RezError::MissingRepository => ErrorContext::new(error)
            .with_suggestion("Pass the repository as --repo owner/name, e.g. --repo microsoft/TypeScript"),

        Npm2RezError::InvalidPackageName {
            ..
        } => ErrorContext::new(error).with_details(
            "'-' and '/' become '_' and '@' is removed; the rest must be letters, digits or '_' and must not start with a digit",
        ),

        Npm2RezError::NameCollision {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use a different --output directory for one of the packages")
            .with_details("rez cannot distinguish the two packages, so the existing one is kept"),

        Npm2RezError::ConfigNotFound {
            path,
        } => {
            let suggestion = format!("Create {path} or drop --config / NPM2REZ_CONFIG");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        Npm2RezError::ConfigError {
            ..
        }
        | Npm2RezError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check the TOML syntax and keys of your npm2rez config file"),

        _ => ErrorContext::new(error),
    }
}
