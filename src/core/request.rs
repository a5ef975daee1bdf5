//! The validated description of a single conversion.
//!
//! A [`PackageRequest`] can only be obtained from [`PackageRequestBuilder::build`], so any
//! request reaching the pipeline already satisfies two rules:
//!
//! - a GitHub source always carries a repository identifier
//! - the name normalizes to a usable rez name: non-empty, only ASCII letters, digits and
//!   `_`, not starting with a digit (it also names the `<NAME>_ROOT` variable in
//!   `package.py`)

use anyhow::Result;
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;

use crate::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_RUNTIME_VERSION};
use crate::core::Npm2RezError;
use crate::naming::normalize_name;

/// Where the package contents come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SourceKind {
    /// Published release on the npm registry
    #[default]
    Npm,
    /// Tagged release (`v<version>`) of a GitHub repository, built locally
    Github,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Npm => write!(f, "npm"),
            Self::Github => write!(f, "github"),
        }
    }
}

/// One package to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    name: String,
    version: String,
    source: SourceKind,
    repo: Option<String>,
    runtime_version: String,
    bin_name: Option<String>,
    output_root: PathBuf,
}

impl PackageRequest {
    /// Start building a request for `name@version`.
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> PackageRequestBuilder {
        PackageRequestBuilder::new(name, version)
    }

    /// The npm identifier exactly as given, e.g. `@types/node`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string, used verbatim.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn source(&self) -> SourceKind {
        self.source
    }

    /// `owner/name` of the GitHub repository. Always `Some` for [`SourceKind::Github`].
    #[must_use]
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Minimum runtime version written as `nodejs-<version>+`.
    #[must_use]
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    /// Executable that should be put on `PATH`, if any.
    #[must_use]
    pub fn bin_name(&self) -> Option<&str> {
        self.bin_name.as_deref()
    }

    #[must_use]
    pub fn output_root(&self) -> &PathBuf {
        &self.output_root
    }

    /// The rez-safe package name.
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }

    /// `name@version`, as passed to `npm install`.
    #[must_use]
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

/// Builder for [`PackageRequest`].
///
/// # Examples
///
/// ```rust
/// use npm2rez::core::{PackageRequest, SourceKind};
///
/// let request = PackageRequest::builder("@types/node", "18.11.9")
///     .output_root("/tmp/rez")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.normalized_name(), "types_node");
/// assert_eq!(request.source(), SourceKind::Npm);
/// assert_eq!(request.runtime_version(), "16");
/// ```
#[derive(Debug, Clone)]
pub struct PackageRequestBuilder {
    name: String,
    version: String,
    source: SourceKind,
    repo: Option<String>,
    runtime_version: String,
    bin_name: Option<String>,
    output_root: PathBuf,
}

impl PackageRequestBuilder {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            source: SourceKind::default(),
            repo: None,
            runtime_version: DEFAULT_RUNTIME_VERSION.to_string(),
            bin_name: None,
            output_root: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    #[must_use]
    pub const fn source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    #[must_use]
    pub fn repo(mut self, repo: Option<impl Into<String>>) -> Self {
        self.repo = repo.map(Into::into);
        self
    }

    #[must_use]
    pub fn runtime_version(mut self, version: impl Into<String>) -> Self {
        self.runtime_version = version.into();
        self
    }

    #[must_use]
    pub fn bin_name(mut self, bin_name: Option<impl Into<String>>) -> Self {
        self.bin_name = bin_name.map(Into::into);
        self
    }

    #[must_use]
    pub fn output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Validate and produce the request.
    ///
    /// # Errors
    ///
    /// - [`Npm2RezError::MissingRepository`] for a GitHub source without a repository
    /// - [`Npm2RezError::InvalidPackageName`] if the normalized name is not a usable rez name
    pub fn build(self) -> Result<PackageRequest> {
        if let Some(reason) = invalid_name_reason(&normalize_name(&self.name)) {
            return Err(Npm2RezError::InvalidPackageName {
                name: self.name,
                reason: reason.to_string(),
            }
            .into());
        }

        let repo = match self.source {
            SourceKind::Github => {
                let repo = self.repo.filter(|r| !r.trim().is_empty());
                if repo.is_none() {
                    return Err(Npm2RezError::MissingRepository.into());
                }
                repo
            }
            SourceKind::Npm => {
                if let Some(repo) = &self.repo {
                    tracing::debug!("Ignoring --repo {} for npm source", repo);
                }
                None
            }
        };

        Ok(PackageRequest {
            name: self.name,
            version: self.version,
            source: self.source,
            repo,
            runtime_version: self.runtime_version,
            bin_name: self.bin_name,
            output_root: self.output_root,
        })
    }
}

fn invalid_name_reason(normalized: &str) -> Option<&'static str> {
    let Some(first) = normalized.chars().next() else {
        return Some("it contains no characters usable in a rez package name");
    };
    if first.is_ascii_digit() {
        return Some("rez package names must not start with a digit");
    }
    if !normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Some("rez package names may only contain letters, digits and '_'");
    }
    None
}
