//! Rendering and writing `package.py`.
//!
//! The manifest is the file rez reads to learn a package's name, version, requirements
//! and the environment it sets up. npm2rez renders it from a Tera template:
//!
//! ```python
//! name = "types_node"
//! version = "18.11.9"
//!
//! description = "Rez package for @types/node Node.js package"
//!
//! requires = [
//!     "nodejs-16+",
//! ]
//!
//! def commands():
//!     import os
//!     # Set environment variable (uppercase, replace hyphen with underscore)
//!     env.TYPES_NODE_ROOT = "{root}"
//!
//!     # Add to NODE_PATH
//!     if "NODE_PATH" not in env:
//!         env.NODE_PATH = "{root}/node_modules"
//!     else:
//!         env.NODE_PATH.append("{root}/node_modules")
//! ```
//!
//! `{root}` is written literally; rez substitutes the package root when it resolves the
//! package. When the request names an executable, a `PATH` entry for `{root}/bin` is
//! added before the `NODE_PATH` block.
//!
//! The description line doubles as the record of the original npm name, which
//! [`recorded_original_name`] reads back when checking for name collisions.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tera::Tera;

use crate::constants::MANIFEST_FILE_NAME;
use crate::core::{Npm2RezError, PackageRequest};
use crate::naming::{normalize_name, root_env_var};
use crate::utils::fs::safe_write;

const DESCRIPTION_PREFIX: &str = "Rez package for ";
const DESCRIPTION_SUFFIX: &str = " Node.js package";

const PACKAGE_PY_TEMPLATE: &str = r#"name = "{{ name | pystr }}"
version = "{{ version | pystr }}"

description = "Rez package for {{ original_name | pystr }} Node.js package"

requires = [
    "{{ runtime_package | pystr }}-{{ runtime_version | pystr }}+",
]

def commands():
    import os
    # Set environment variable (uppercase, replace hyphen with underscore)
    env.{{ root_var }} = "{root}"
{%- if has_executables %}

    # Add executable to PATH
    env.PATH.append("{root}/bin")
{%- endif %}

    # Add to NODE_PATH
    if "NODE_PATH" not in env:
        env.NODE_PATH = "{root}/node_modules"
    else:
        env.NODE_PATH.append("{root}/node_modules")
"#;

/// Values substituted into the `package.py` template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RezManifest {
    pub name: String,
    pub version: String,
    pub original_name: String,
    pub runtime_package: String,
    pub runtime_version: String,
    pub root_var: String,
    pub has_executables: bool,
}

impl RezManifest {
    /// Manifest for `request`, requiring `runtime_package` (normally `nodejs`).
    #[must_use]
    pub fn from_request(request: &PackageRequest, runtime_package: &str) -> Self {
        let name = normalize_name(request.name());
        Self {
            root_var: root_env_var(&name),
            name,
            version: request.version().to_string(),
            original_name: request.name().to_string(),
            runtime_package: runtime_package.to_string(),
            runtime_version: request.runtime_version().to_string(),
            has_executables: request.bin_name().is_some(),
        }
    }

    /// Render the manifest text.
    ///
    /// # Errors
    ///
    /// Returns [`Npm2RezError::ManifestRender`] if the template engine fails.
    pub fn render(&self) -> Result<String> {
        let mut tera = Tera::default();
        tera.register_filter("pystr", python_string_filter);

        let context = tera::Context::from_serialize(self).map_err(|e| render_error(&e))?;
        let rendered =
            tera.render_str(PACKAGE_PY_TEMPLATE, &context).map_err(|e| render_error(&e))?;
        Ok(rendered)
    }
}

fn render_error(e: &tera::Error) -> anyhow::Error {
    let mut reason = e.to_string();
    let mut source = std::error::Error::source(e);
    while let Some(cause) = source {
        reason.push_str(": ");
        reason.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    Npm2RezError::ManifestRender {
        file: MANIFEST_FILE_NAME.to_string(),
        reason,
    }
    .into()
}

fn python_string_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = value.as_str().ok_or_else(|| tera::Error::msg("pystr filter requires a string"))?;
    Ok(tera::Value::String(escape_python_string(s)))
}

/// Escape `s` for use inside a double-quoted Python string literal.
#[must_use]
pub fn escape_python_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn unescape_python_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

/// Render and write `package.py` into `layout_root`, replacing any previous manifest.
///
/// Returns the path of the written file.
pub fn write_manifest(
    request: &PackageRequest,
    runtime_package: &str,
    layout_root: &Path,
) -> Result<PathBuf> {
    let content = RezManifest::from_request(request, runtime_package).render()?;
    let path = layout_root.join(MANIFEST_FILE_NAME);

    safe_write(&path, &content)
        .with_context(|| format!("Failed to write manifest: {}", path.display()))?;

    tracing::info!("Created {}", path.display());
    Ok(path)
}

/// The original npm name recorded in a manifest's description, if it has one.
///
/// ```rust
/// use npm2rez::manifest::recorded_original_name;
///
/// let manifest = "description = \"Rez package for @types/node Node.js package\"\n";
/// assert_eq!(recorded_original_name(manifest).as_deref(), Some("@types/node"));
/// ```
#[must_use]
pub fn recorded_original_name(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let value = line.trim().strip_prefix("description")?.trim_start().strip_prefix('=')?;
        let quoted = value.trim().strip_prefix('"')?.strip_suffix('"')?;
        let name = quoted.strip_prefix(DESCRIPTION_PREFIX)?.strip_suffix(DESCRIPTION_SUFFIX)?;
        Some(unescape_python_string(name))
    })
}
