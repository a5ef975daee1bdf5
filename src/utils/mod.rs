//! Cross-platform utilities
//!
//! - [`fs`] - directory merging, executable linking and atomic writes
//! - [`platform`] - OS detection and user path resolution
//! - [`progress`] - the spinner shown while external tools run

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, copy_dir, ensure_dir, safe_write};
pub use platform::{is_windows, resolve_path};
pub use progress::Spinner;
