//! Core types for npm2rez
//!
//! This module holds the pieces every pipeline stage depends on:
//!
//! - [`error`] - [`Npm2RezError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`request`] - [`PackageRequest`], the validated description of one conversion
//!
//! # Examples
//!
//! ```rust
//! use npm2rez::core::{Npm2RezError, PackageRequest, SourceKind};
//!
//! let error = PackageRequest::builder("typescript", "4.9.5")
//!     .source(SourceKind::Github)
//!     .build()
//!     .unwrap_err();
//!
//! assert!(matches!(
//!     error.downcast_ref::<Npm2RezError>(),
//!     Some(Npm2RezError::MissingRepository)
//! ));
//! ```

pub mod error;
pub mod request;

pub use error::{ErrorContext, Npm2RezError, user_friendly_error};
pub use request::{PackageRequest, PackageRequestBuilder, SourceKind};
