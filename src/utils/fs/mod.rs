//! File system helpers
//!
//! Path naming rules shared by the pipeline, the CLI and the build manifest, plus
//! atomic output writes.
//!
//! ```rust,no_run
//! use bundlebars::utils::fs::{template_ext, template_stem};
//! use std::path::Path;
//!
//! let page = Path::new("templates/index.page.hbs");
//! assert_eq!(template_stem(page), "index.page");
//! assert_eq!(template_ext(page), ".hbs");
//! ```

pub mod atomic;

pub use atomic::{atomic_write, write_output};

use std::path::{Path, PathBuf};

/// Logical name of a template: its file name without the final extension.
#[must_use]
pub fn template_stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Final extension of a template including the dot, or an empty string.
#[must_use]
pub fn template_ext(path: &Path) -> String {
    path.extension().map(|ext| format!(".{}", ext.to_string_lossy())).unwrap_or_default()
}

/// Directory containing a template; `.` for bare file names.
#[must_use]
pub fn template_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Whether a data file is YAML, judged by its `.yml`/`.yaml` extension.
#[must_use]
pub fn is_yaml(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("yml" | "yaml"))
}
