//! `bundlebars precompile`: serialize templates, optionally wrapped into a bundle.

use anyhow::Result;
use clap::Args;

use super::common::CompilerArgs;
use crate::pipeline::WrapperRef;

/// Precompile templates and their partials.
///
/// ```bash
/// bundlebars precompile --partials templates/partials --wrapper json-bundle -o dist templates/*.hbs
/// ```
#[derive(Args, Debug, Clone)]
pub struct PrecompileCommand {
    #[command(flatten)]
    pub args: CompilerArgs,

    /// Built-in wrapper (`json`, `json-bundle`) or a wrapper template file
    #[arg(short, long, value_name = "NAME|PATH")]
    pub wrapper: Option<WrapperRef>,
}

impl PrecompileCommand {
    /// Precompile every source and write the results.
    ///
    /// # Errors
    ///
    /// Returns an error if any source failed.
    pub async fn execute(self) -> Result<()> {
        let wrapper = self.wrapper;

        self.args
            .run_each("precompile", |mut bundler, template| {
                let wrapper = wrapper.clone();
                async move { bundler.precompile(template, wrapper).await }
            })
            .await
    }
}
