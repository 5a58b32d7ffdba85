//! `bundlebars compile`: render templates with data.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use super::common::CompilerArgs;
use crate::pipeline::ContextSource;

/// Render templates, resolving partials and helpers, against a data file.
///
/// ```bash
/// bundlebars compile --partials templates/partials --data data/site.yml templates/index.hbs
/// cat page.hbs | bundlebars compile --partials partials --partials-ext .hbs -
/// ```
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    #[command(flatten)]
    pub args: CompilerArgs,

    /// JSON or YAML data file; a missing file renders with empty data
    #[arg(short, long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

impl CompileCommand {
    /// Render every source and write the results.
    ///
    /// # Errors
    ///
    /// Returns an error if any source failed.
    pub async fn execute(self) -> Result<()> {
        let data = self.data.map(ContextSource::Path);

        self.args
            .run_each("compile", |mut bundler, template| {
                let data = data.clone();
                async move { bundler.compile(template, data).await }
            })
            .await
    }
}
