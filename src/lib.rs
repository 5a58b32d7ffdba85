//! Bundlebars - Handlebars compiler with automatic partial bundling
//!
//! Bundlebars turns a Handlebars template into rendered output or into a portable
//! precompiled artifact. Partials referenced by the template, directly or through other
//! partials, are discovered and registered automatically, and precompiled output can be
//! wrapped into a loadable bundle.
//!
//! # Architecture Overview
//!
//! Each call on a [`Bundler`](pipeline::Bundler) runs a pipeline of stages over one
//! [`PipelineState`](pipeline::PipelineState):
//!
//! 1. read the template from a file or a byte stream
//! 2. resolve the data context from a JSON/YAML file or in-memory data
//! 3. load helpers (once per bundler)
//! 4. discover and register partials, leaves first
//! 5. render, or precompile the template and every registered partial
//! 6. optionally render a wrapper template over the precompiled output
//!
//! Stages 1 to 3 run concurrently. The first failing stage fails the call.
//!
//! # Core Modules
//!
//! - [`pipeline`] - the [`Bundler`](pipeline::Bundler), its stages and built-in wrappers
//! - [`resolver`] - partial discovery and the worklist resolver
//! - [`templating`] - the Handlebars engine, helpers and precompiled artifacts
//! - [`config`] - instance configuration and the `Bundlebars.toml` build manifest
//! - [`core`] - error taxonomy and user-facing error reporting
//! - [`cli`] - the `bundlebars` command line
//! - [`utils`] - path naming rules and atomic writes
//!
//! # Example
//!
//! ```rust,no_run
//! use bundlebars::config::BundlerConfig;
//! use bundlebars::pipeline::Bundler;
//!
//! # async fn example() -> bundlebars::core::Result<()> {
//! let mut bundler = Bundler::new(BundlerConfig::default());
//! let html = bundler.compile("templates/index.hbs", Some("data/index.yml".into())).await?;
//! println!("{html}");
//! # Ok(())
//! # }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! bundlebars compile --partials templates/partials --data data.json templates/index.hbs
//! bundlebars precompile --partials templates/partials --wrapper json-bundle -o dist templates/*.hbs
//! bundlebars build
//! ```

// Core functionality modules
pub mod config;
pub mod core;
pub mod pipeline;
pub mod resolver;
pub mod templating;

// Command line
pub mod cli;

// Supporting modules
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
