//! Build manifest (`Bundlebars.toml`) for batch compilation.
//!
//! A manifest maps file patterns to repeated pipeline invocations:
//!
//! ```toml
//! [options]
//! partials = "templates/partials/$0.hbs"
//! helpers = "helpers"
//!
//! [[targets]]
//! src = ["templates/pages/*.hbs"]
//! dest = "dist"
//! data = "data/$0.yml"
//!
//! [[targets]]
//! src = ["templates/widgets/*.hbs"]
//! dest = "dist/widgets"
//! precompile = true
//! wrapper = "json-bundle"
//! ```
//!
//! Values in a target override the manifest-level `[options]`. Relative paths are
//! resolved against the directory containing the manifest.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{BundlerConfig, CompilerOptions, PARTIAL_NAME_PLACEHOLDER, normalize_ext};
use crate::utils::fs::template_stem;

/// Default manifest file name looked up by `bundlebars build`.
pub const MANIFEST_FILE_NAME: &str = "Bundlebars.toml";

/// Parsed `Bundlebars.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildManifest {
    /// Defaults shared by every target
    #[serde(default)]
    pub options: BuildOptions,

    /// Batches of templates
    #[serde(default)]
    pub targets: Vec<BuildTarget>,
}

/// Per-target options; every field falls back to the manifest-level value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildOptions {
    /// Partials directory, or `dir/$0.ext`-style path whose extension becomes the partials extension
    pub partials: Option<String>,
    /// Helpers directory
    pub helpers: Option<PathBuf>,
    /// Disable partial discovery
    pub no_partials: Option<bool>,
    /// Precompile instead of render
    pub precompile: Option<bool>,
    /// Wrapper name (`json`, `json-bundle`) or template path, precompile only
    pub wrapper: Option<String>,
    /// Context data file selection, compile only
    pub data: Option<DataOption>,
    /// Output file extension
    pub ext: Option<String>,
    /// Engine options
    pub compiler_options: Option<CompilerOptions>,
}

/// How a target finds the context data of each template.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DataOption {
    /// `true`: a `.json` file next to the template; `false`: no data
    Enabled(bool),
    /// A file or directory, `$0` replaced by the template name
    Path(String),
}

/// One batch of templates written to a destination directory.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildTarget {
    /// Glob patterns selecting templates
    pub src: Vec<String>,
    /// Output directory
    pub dest: PathBuf,
    /// Overrides of the manifest-level options
    #[serde(flatten)]
    pub options: BuildOptions,
}

impl BuildManifest {
    /// Read and parse a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid manifest TOML.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read build manifest: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse build manifest: {}", path.display()))
    }
}

impl BuildOptions {
    /// Fill every unset field from `defaults`.
    #[must_use]
    pub fn merged_with(&self, defaults: &BuildOptions) -> BuildOptions {
        BuildOptions {
            partials: self.partials.clone().or_else(|| defaults.partials.clone()),
            helpers: self.helpers.clone().or_else(|| defaults.helpers.clone()),
            no_partials: self.no_partials.or(defaults.no_partials),
            precompile: self.precompile.or(defaults.precompile),
            wrapper: self.wrapper.clone().or_else(|| defaults.wrapper.clone()),
            data: self.data.clone().or_else(|| defaults.data.clone()),
            ext: self.ext.clone().or_else(|| defaults.ext.clone()),
            compiler_options: self
                .compiler_options
                .clone()
                .or_else(|| defaults.compiler_options.clone()),
        }
    }

    /// Whether templates are precompiled rather than rendered.
    #[must_use]
    pub fn is_precompile(&self) -> bool {
        self.precompile.unwrap_or(false)
    }

    /// Instance configuration for this target, paths resolved against `base_dir`.
    ///
    /// A `partials` value carrying a file extension is split into directory and extension.
    #[must_use]
    pub fn bundler_config(&self, base_dir: &Path) -> BundlerConfig {
        let mut config = BundlerConfig::default()
            .with_no_partials(self.no_partials.unwrap_or(false))
            .with_compiler_options(self.compiler_options.clone().unwrap_or_default());

        if let Some(partials) = &self.partials {
            let partials = base_dir.join(partials);
            match (partials.extension(), partials.parent()) {
                (Some(ext), Some(parent)) => {
                    let ext = normalize_ext(&ext.to_string_lossy());
                    config = config.with_partials_dir(parent).with_partials_ext(ext);
                }
                _ => config = config.with_partials_dir(partials),
            }
        }

        if let Some(helpers) = &self.helpers {
            config = config.with_helpers_dir(base_dir.join(helpers));
        }

        config
    }

    /// Context data file for template `src`, if any.
    ///
    /// Rendering targets default to `data = true`. A `.json` candidate that does not
    /// exist falls back to a `.yml`, then `.yaml`, sibling.
    #[must_use]
    pub fn data_path(&self, src: &Path, base_dir: &Path) -> Option<PathBuf> {
        let name = template_stem(src);

        let candidate = match &self.data {
            Some(DataOption::Enabled(true)) => src.with_extension("json"),
            None if !self.is_precompile() => src.with_extension("json"),
            Some(DataOption::Path(path)) => {
                let path = base_dir.join(path.replace(PARTIAL_NAME_PLACEHOLDER, &name));
                if path.is_dir() { path.join(format!("{name}.json")) } else { path }
            }
            Some(DataOption::Enabled(false)) | None => return None,
        };

        if candidate.exists() || candidate.extension().is_none_or(|ext| ext != "json") {
            return Some(candidate);
        }

        ["yml", "yaml"]
            .iter()
            .map(|ext| candidate.with_extension(ext))
            .find(|path| path.exists())
            .or(Some(candidate))
    }

    /// Output file extension, `.json` for precompiled targets and `.html` otherwise.
    #[must_use]
    pub fn output_ext(&self) -> String {
        match &self.ext {
            Some(ext) => normalize_ext(ext),
            None if self.is_precompile() => ".json".to_string(),
            None => ".html".to_string(),
        }
    }
}

impl BuildTarget {
    /// Expand `src` patterns relative to `base_dir` into a sorted, de-duplicated file list.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not valid glob syntax.
    pub fn expand_sources(&self, base_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for pattern in &self.src {
            let full = base_dir.join(pattern);
            let full = full.to_string_lossy();
            let entries =
                glob::glob(&full).with_context(|| format!("Invalid glob pattern: {pattern}"))?;

            for entry in entries {
                let path = entry.with_context(|| format!("Failed to expand pattern: {pattern}"))?;
                if path.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Destination file for template `src`.
    #[must_use]
    pub fn output_path(&self, base_dir: &Path, src: &Path, ext: &str) -> PathBuf {
        base_dir.join(&self.dest).join(format!("{}{ext}", template_stem(src)))
    }
}
