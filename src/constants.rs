//! Fixed names and conventions shared across npm2rez.
//!
//! These values describe the contract with npm, GitHub and rez. They are not part of the
//! user configuration because changing them would produce packages other tools cannot
//! consume.

/// Name of the rez manifest written at the root of every package version.
pub const MANIFEST_FILE_NAME: &str = "package.py";

/// Directory holding executables linked (or copied) out of `node_modules/.bin`.
pub const BIN_DIR: &str = "bin";

/// Directory npm installs packages into; also the `NODE_PATH` entry.
pub const NODE_MODULES_DIR: &str = "node_modules";

/// npm's per-install executables directory, relative to the install root.
pub const NODE_MODULES_BIN_DIR: &str = ".bin";

/// Transient project descriptor written before a registry install.
pub const PROJECT_DESCRIPTOR_FILE: &str = "package.json";

/// Name recorded in the transient project descriptor.
pub const PROJECT_DESCRIPTOR_NAME: &str = "npm2rez-temp";

/// Prefix of the sibling directory a GitHub source is cloned into.
pub const CLONE_DIR_PREFIX: &str = "temp_repo-";

/// Git tags are expected to be the package version prefixed with `v`.
pub const RELEASE_TAG_PREFIX: &str = "v";

/// Hosting provider URL for GitHub sources. `{repo}` is `owner/name`.
pub const REPOSITORY_URL_TEMPLATE: &str = "https://github.com/{repo}.git";

/// npm script run after installing a cloned repository's dependencies.
pub const BUILD_SCRIPT: &str = "build";

/// Default runtime constraint (`nodejs-16+`).
pub const DEFAULT_RUNTIME_VERSION: &str = "16";

/// Default root directory for `create`.
pub const DEFAULT_OUTPUT_DIR: &str = "./rez-packages";

/// Setting this variable enables the integration tests that talk to the real registry.
pub const REAL_PACKAGE_TESTS_ENV: &str = "RUN_REAL_PACKAGE_TESTS";
