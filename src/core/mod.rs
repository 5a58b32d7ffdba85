//! Core types for Bundlebars
//!
//! This module holds the error taxonomy shared by every stage of the pipeline and the
//! presentation layer the CLI uses to report failures.
//!
//! - [`BundlebarsError`] - enumerated failures of a compile/precompile invocation
//! - [`ErrorKind`] - copyable classification for callers and tests
//! - [`ErrorContext`] / [`user_friendly_error`] - terminal-friendly error output

pub mod error;

pub use error::{BoxError, BundlebarsError, ErrorContext, ErrorKind, Result, user_friendly_error};
