//! Compiler options passed through to the template engine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{BundlebarsError, Result};

/// Engine configuration applied to every compile, render and precompile of one instance.
///
/// Keys are accepted in `snake_case` or in the `camelCase` spelling used by
/// Handlebars options files (`noEscape`, `preventIndent`, ...). Unknown keys are ignored
/// so that option files shared with other Handlebars tooling still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Disable HTML escaping of `{{expr}}` substitutions
    #[serde(alias = "noEscape")]
    pub no_escape: bool,

    /// Fail on missing variables instead of rendering them empty
    #[serde(alias = "strictMode")]
    pub strict: bool,

    /// Do not indent partial output to the indentation of the inclusion marker
    #[serde(alias = "preventIndent")]
    pub prevent_indent: bool,

    /// Re-read file-backed templates on every render
    #[serde(alias = "devMode")]
    pub dev_mode: bool,
}

impl CompilerOptions {
    /// Options with escaping disabled, used for wrapper passes.
    #[must_use]
    pub fn no_escape() -> Self {
        Self {
            no_escape: true,
            ..Self::default()
        }
    }

    /// Load options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`BundlebarsError::CompilerOptions`] if the file cannot be read or is not
    /// a JSON object matching [`CompilerOptions`].
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            BundlebarsError::CompilerOptions {
                path: path.to_path_buf(),
                source: Box::new(e),
            }
        })?;

        serde_json::from_str(&content).map_err(|e| BundlebarsError::CompilerOptions {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }
}
