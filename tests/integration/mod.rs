//! Integration test suite for Bundlebars
//!
//! End-to-end tests through the public library API and the compiled binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **api**: compile, precompile and wrapping through [`bundlebars::pipeline::Bundler`]
//! - **cli**: the `compile` and `precompile` subcommands
//! - **build**: `bundlebars build` with a `Bundlebars.toml` manifest

mod common;

mod api;
mod build;
mod cli;
