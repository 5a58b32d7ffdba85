//! Configuration for Bundlebars
//!
//! Two layers of configuration exist:
//!
//! 1. **Instance configuration** ([`BundlerConfig`]) - how one [`Bundler`](crate::pipeline::Bundler)
//!    finds partials and helpers and which [`CompilerOptions`] it hands to the engine.
//! 2. **Build manifest** ([`BuildManifest`]) - a `Bundlebars.toml` file describing batches of
//!    templates to compile or precompile, consumed by `bundlebars build`.
//!
//! Every field is optional. Absent values trigger the defaulting described on each field,
//! resolved once per instance and cached there.
//!
//! # Partial lookup
//!
//! A partial named `header` is read from `<partials_dir>/header<partials_ext>`. When
//! `partials_dir` contains the `$0` placeholder, it is replaced by the partial name first,
//! so `partials/$0` supports layouts such as `partials/header/header.hbs`.
//!
//! ```rust,no_run
//! use bundlebars::config::{BundlerConfig, CompilerOptions};
//!
//! let config = BundlerConfig::default()
//!     .with_partials_dir("templates/partials/$0")
//!     .with_partials_ext(".hbs")
//!     .with_compiler_options(CompilerOptions::no_escape());
//! ```

pub mod build;
pub mod options;

pub use build::{BuildManifest, BuildOptions, BuildTarget, DataOption, MANIFEST_FILE_NAME};
pub use options::CompilerOptions;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Placeholder in a partials directory that is substituted with the partial name.
pub const PARTIAL_NAME_PLACEHOLDER: &str = "$0";

/// Configuration of one [`Bundler`](crate::pipeline::Bundler) instance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// Directory partials are read from. Defaults to the main template's directory.
    pub partials_dir: Option<PathBuf>,

    /// Extension of partial files, including the dot. Defaults to the main template's extension.
    pub partials_ext: Option<String>,

    /// Directory of helper modules. Without it only the built-in helpers are available.
    pub helpers_dir: Option<PathBuf>,

    /// Disable partial discovery entirely.
    pub no_partials: bool,

    /// Options handed to the engine.
    pub compiler_options: CompilerOptions,
}

impl BundlerConfig {
    /// Set the partials directory.
    pub fn with_partials_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.partials_dir = Some(dir.into());
        self
    }

    /// Set the partials extension (`".hbs"`; a missing leading dot is added).
    pub fn with_partials_ext(mut self, ext: impl Into<String>) -> Self {
        self.partials_ext = Some(normalize_ext(&ext.into()));
        self
    }

    /// Set the helpers directory.
    pub fn with_helpers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.helpers_dir = Some(dir.into());
        self
    }

    /// Enable or disable partial discovery.
    #[must_use]
    pub fn with_no_partials(mut self, no_partials: bool) -> Self {
        self.no_partials = no_partials;
        self
    }

    /// Set the engine options.
    #[must_use]
    pub fn with_compiler_options(mut self, options: CompilerOptions) -> Self {
        self.compiler_options = options;
        self
    }
}

/// Ensure a non-empty extension starts with a dot.
pub(crate) fn normalize_ext(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Path of the backing file for partial `name`.
///
/// Substitutes [`PARTIAL_NAME_PLACEHOLDER`] in `dir` and appends `name` + `ext`.
#[must_use]
pub fn partial_path(dir: &Path, name: &str, ext: &str) -> PathBuf {
    let dir = dir.to_string_lossy();
    let dir = if dir.contains(PARTIAL_NAME_PLACEHOLDER) {
        PathBuf::from(dir.replace(PARTIAL_NAME_PLACEHOLDER, name))
    } else {
        PathBuf::from(dir.as_ref())
    };
    dir.join(format!("{name}{ext}"))
}
