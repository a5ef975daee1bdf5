//! Test utilities for npm2rez
//!
//! Compiled for unit tests and, through the `test-utils` feature, for the integration
//! suite. Nothing here touches the network or runs npm or git.
//!
//! - [`RecordingRunner`] - a [`crate::exec::CommandRunner`] that records commands and
//!   simulates their effects
//! - [`fake_executable`] - an executable file for the locator to find
//! - [`init_test_logging`] - opt-in log output for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use npm2rez::test_utils::{RecordingRunner, init_test_logging};
//!
//! init_test_logging(None);
//! let runner = RecordingRunner::new().fail_on("run build", "tsc: error TS2304");
//! ```

pub mod fixtures;
pub mod runner;

pub use fixtures::{fake_executable, write_manifest_fixture};
pub use runner::RecordingRunner;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// With `None`, output is only enabled when `RUST_LOG` is set:
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
