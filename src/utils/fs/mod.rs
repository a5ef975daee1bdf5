//! File system helpers used by the package pipeline.
//!
//! - [`dirs`] - creating and merging directory trees, linking executables
//! - [`atomic`] - write-then-rename file writes for manifests and descriptors
//!
//! Every function returns [`anyhow::Result`] with the offending path in the context.

pub mod atomic;
pub mod dirs;

pub use atomic::{atomic_write, safe_write, write_json_file};
pub use dirs::{copy_dir, ensure_dir, link_or_copy};
