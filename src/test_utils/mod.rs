//! Test utilities for Bundlebars
//!
//! Helpers shared by unit and integration tests:
//! - [`init_test_logging`] - route `tracing` output to the test harness
//! - [`TestProject`] - a temporary template project with fixture files
//!
//! # Example
//!
//! ```rust,no_run
//! use bundlebars::test_utils::{TestProject, init_test_logging};
//!
//! init_test_logging(None);
//! let project = TestProject::new().unwrap();
//! project.write("page.hbs", "{{> header}}").unwrap();
//! project.write("header.hbs", "<h1>{{title}}</h1>").unwrap();
//! ```

pub mod project;

pub use project::TestProject;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Installs a test-writer subscriber at most once per process. Uses `level` when given,
/// otherwise `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=bundlebars=debug cargo test
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
