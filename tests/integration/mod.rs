//! Integration test suite for npm2rez
//!
//! ```bash
//! cargo test --test integration
//!
//! # include the tests that download real packages from the npm registry
//! RUN_REAL_PACKAGE_TESTS=1 cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli_commands**: the `npm2rez` binary, with npm missing or replaced by a script
//! - **create_pipeline**: `Pipeline` driven through a recording runner
//! - **real_packages**: real npm and network, skipped unless `RUN_REAL_PACKAGE_TESTS` is set

mod common;

mod cli_commands;
mod create_pipeline;
mod real_packages;
