//! npm2rez - convert npm packages into rez packages
//!
//! npm2rez materializes a Node.js package, published on the npm registry or tagged in a
//! GitHub repository, as a rez package: a versioned directory holding the package files
//! and a `package.py` that declares metadata, the `nodejs` runtime requirement and the
//! environment changes rez applies when the package is resolved.
//!
//! # Architecture Overview
//!
//! The pipeline for a single request is strictly sequential:
//!
//! 1. [`naming`] turns the npm identifier into a rez-safe name (`@types/node` -> `types_node`)
//! 2. [`package`] creates `<output>/<name>/<version>/` and checks for name collisions
//! 3. [`manifest`] renders `package.py`
//! 4. [`exec::locator`] finds the `npm` executable and checks `--version`
//! 5. [`installer`] runs either the registry install or the clone-and-build install
//!
//! Every external process goes through the [`exec::CommandRunner`] trait, so the whole
//! pipeline can be exercised without network or process activity.
//!
//! # Produced Layout
//!
//! ```text
//! rez-packages/
//! └── types_node/
//!     └── 18.11.9/
//!         ├── package.py
//!         ├── package.json
//!         ├── bin/
//!         └── node_modules/
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Package a registry release
//! npm2rez create --name typescript --version 4.9.5 --bin-name tsc
//!
//! # Package a tagged GitHub release (tag v4.9.5), built with `npm run build`
//! npm2rez create --name typescript --version 4.9.5 --source github --repo microsoft/TypeScript
//!
//! # Only fetch the package contents into a directory
//! npm2rez extract --name eslint --version 8.40.0 --output ./vendor
//! ```

// Core functionality modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;

// Pipeline stages
pub mod exec;
pub mod installer;
pub mod manifest;
pub mod naming;
pub mod package;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
