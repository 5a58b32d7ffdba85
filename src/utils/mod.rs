//! Utilities shared across the crate
//!
//! - [`fs`] - template path naming rules and atomic output writes

pub mod fs;

pub use fs::{atomic_write, template_ext, template_stem};
