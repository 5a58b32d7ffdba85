//! `bundlebars build`: run every target of a `Bundlebars.toml` manifest.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::output::write_file;
use crate::config::{BuildManifest, BuildOptions, BuildTarget, MANIFEST_FILE_NAME};
use crate::core::user_friendly_error;
use crate::pipeline::{Bundler, ContextSource, WrapperRef};
use crate::utils::fs::template_dir;

/// Build all targets of a manifest.
///
/// Each target gets one bundler, so helpers load once per target and precompiled
/// outputs of a target share the partials registered by earlier templates of the same
/// target. Templates of a target are processed in path order.
///
/// ```bash
/// bundlebars build
/// bundlebars build --manifest site/Bundlebars.toml
/// ```
#[derive(Args, Debug, Clone, Default)]
pub struct BuildCommand {
    /// Manifest file; relative paths inside it resolve against its directory
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

/// Outcome counters of a build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Files written
    pub written: usize,
    /// Templates that failed
    pub failed: usize,
}

impl BuildCommand {
    /// Run the build.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be loaded, a pattern is invalid, an output
    /// cannot be written, or any template failed.
    pub async fn execute(self) -> Result<()> {
        let summary = self.run().await?;

        if summary.failed > 0 {
            return Err(anyhow!(
                "{} template(s) failed, {} file(s) written",
                summary.failed,
                summary.written
            ));
        }

        println!("{} Built {} file(s)", "✓".green(), summary.written);
        Ok(())
    }

    /// Run the build and report counts instead of failing on template errors.
    ///
    /// # Errors
    ///
    /// Returns an error for manifest, pattern and output failures.
    pub async fn run(self) -> Result<BuildSummary> {
        let manifest_path = self.manifest.unwrap_or_else(|| PathBuf::from(MANIFEST_FILE_NAME));
        let manifest = BuildManifest::load(&manifest_path).await?;
        let base_dir = template_dir(&manifest_path);

        if manifest.targets.is_empty() {
            warn!("No targets in {}", manifest_path.display());
        }

        let mut summary = BuildSummary::default();
        for (index, target) in manifest.targets.iter().enumerate() {
            let options = target.options.merged_with(&manifest.options);
            build_target(index + 1, target, &options, &base_dir, &mut summary).await?;
        }

        Ok(summary)
    }
}

async fn build_target(
    number: usize,
    target: &BuildTarget,
    options: &BuildOptions,
    base_dir: &Path,
    summary: &mut BuildSummary,
) -> Result<()> {
    let sources = target
        .expand_sources(base_dir)
        .with_context(|| format!("Failed to expand sources of target {number}"))?;

    if sources.is_empty() {
        warn!("Target {} matched no templates: {:?}", number, target.src);
        return Ok(());
    }
    debug!("Target {}: {} template(s)", number, sources.len());

    let mut bundler = Bundler::new(options.bundler_config(base_dir));
    let wrapper = options.wrapper.as_deref().map(|wrapper| resolve_wrapper(wrapper, base_dir));
    let ext = options.output_ext();

    for src in sources {
        let result = if options.is_precompile() {
            bundler.precompile(src.as_path(), wrapper.clone()).await
        } else {
            let data = options.data_path(&src, base_dir).map(ContextSource::Path);
            bundler.compile(src.as_path(), data).await
        };

        match result {
            Ok(output) => {
                write_file(&target.output_path(base_dir, &src, &ext), output).await?;
                summary.written += 1;
            }
            Err(err) => {
                summary.failed += 1;
                let err = anyhow::Error::from(err)
                    .context(format!("Failed to build '{}'", src.display()));
                user_friendly_error(err).display();
            }
        }
    }

    Ok(())
}

/// Wrapper reference with file paths resolved against the manifest directory.
fn resolve_wrapper(value: &str, base_dir: &Path) -> WrapperRef {
    match WrapperRef::parse(value) {
        WrapperRef::Path(path) => WrapperRef::Path(base_dir.join(path)),
        builtin => builtin,
    }
}
