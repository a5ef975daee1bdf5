//! Mapping npm identifiers onto rez package names.
//!
//! rez names may not contain `-`, `@` or `/`, all of which are common in npm names.
//! [`normalize_name`] is the single mapping used for both the package directory and the
//! `name` field of `package.py`, so the two can never disagree.
//!
//! The mapping is not injective: `a-b` and `a_b` both become `a_b`. The package pipeline
//! checks for that case before overwriting an existing package.

/// Convert an npm package name into a rez package name.
///
/// `-` becomes `_`, `@` is removed and `/` becomes `_`. The result is stable under
/// repeated application.
///
/// # Examples
///
/// ```rust
/// use npm2rez::naming::normalize_name;
///
/// assert_eq!(normalize_name("typescript"), "typescript");
/// assert_eq!(normalize_name("ts-node"), "ts_node");
/// assert_eq!(normalize_name("@types/node"), "types_node");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.replace('-', "_").replace('@', "").replace('/', "_")
}

/// Name of the environment variable pointing at the package root, e.g. `TYPES_NODE_ROOT`.
#[must_use]
pub fn root_env_var(normalized: &str) -> String {
    format!("{}_ROOT", normalized.to_uppercase())
}
