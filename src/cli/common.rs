//! Arguments and execution shared by `compile` and `precompile`.

use anyhow::{Context, Result, anyhow};
use clap::Args;
use futures::future::join_all;
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

use super::output::write_result;
use crate::config::{BundlerConfig, CompilerOptions};
use crate::core::user_friendly_error;
use crate::pipeline::{Bundler, TemplateSource};

/// Source name that reads the template from standard input.
pub const STDIN_SOURCE: &str = "-";

/// Options common to the compiling subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct CompilerArgs {
    /// Template files to process; `-` reads from stdin
    #[arg(required = true, value_name = "SOURCES")]
    pub sources: Vec<String>,

    /// Partials directory; `$0` is replaced by the partial name.
    ///
    /// Partials are only discovered when this is given.
    #[arg(short, long, value_name = "DIR")]
    pub partials: Option<PathBuf>,

    /// Partials file extension, defaults to the template's extension
    #[arg(long, value_name = "EXT")]
    pub partials_ext: Option<String>,

    /// Directory of rhai helper scripts
    #[arg(long, value_name = "DIR")]
    pub helpers: Option<PathBuf>,

    /// JSON file with compiler options (`{"noEscape": true}`)
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Write results into this directory instead of stdout
    #[arg(short, long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

impl CompilerArgs {
    /// Instance configuration shared by every source.
    ///
    /// # Errors
    ///
    /// Returns an error if the compiler options file cannot be loaded.
    pub async fn bundler_config(&self) -> Result<BundlerConfig> {
        let compiler_options = match &self.options {
            Some(path) => CompilerOptions::from_file(path).await?,
            None => CompilerOptions::default(),
        };

        let mut config = BundlerConfig::default()
            .with_no_partials(self.partials.is_none())
            .with_compiler_options(compiler_options);

        if let Some(dir) = &self.partials {
            config = config.with_partials_dir(dir);
        }
        if let Some(ext) = &self.partials_ext {
            config = config.with_partials_ext(ext);
        }
        if let Some(dir) = &self.helpers {
            config = config.with_helpers_dir(dir);
        }

        Ok(config)
    }

    /// Run `job` for every source concurrently, each with its own bundler, and write
    /// each result.
    ///
    /// Failures are reported per source as they happen.
    ///
    /// # Errors
    ///
    /// Returns an error when at least one source failed.
    pub async fn run_each<F, Fut>(&self, verb: &str, job: F) -> Result<()>
    where
        F: Fn(Bundler, TemplateSource) -> Fut,
        Fut: Future<Output = crate::core::Result<String>>,
    {
        let config = self.bundler_config().await?;
        let out = self.out.as_deref();

        let runs = self.sources.iter().map(|src| {
            let bundler = Bundler::new(config.clone());
            let job = job(bundler, template_source(src));
            async move {
                debug!("{} {}", verb, src);
                let result = job.await.with_context(|| format!("Failed to {verb} '{src}'"))?;
                write_result(src, &result, out).await
            }
        });

        let mut failed = 0;
        for err in join_all(runs).await.into_iter().filter_map(std::result::Result::err) {
            failed += 1;
            user_friendly_error(err).display();
        }

        if failed > 0 {
            return Err(anyhow!("{failed} of {} template(s) failed", self.sources.len()));
        }
        Ok(())
    }
}

/// Template reference for a command-line source.
pub fn template_source(src: &str) -> TemplateSource {
    if src == STDIN_SOURCE {
        TemplateSource::stream(tokio::io::stdin())
    } else {
        TemplateSource::Path(PathBuf::from(src))
    }
}
