//! Command-line interface for Bundlebars.
//!
//! # Available Commands
//!
//! - `compile` - render templates with a data file
//! - `precompile` - serialize templates and their partials, optionally wrapped
//! - `build` - run the targets of a `Bundlebars.toml` manifest
//!
//! # Usage Patterns
//!
//! ```bash
//! # Render a page; partials live next to it
//! bundlebars compile --partials templates --data data/home.json templates/home.hbs
//!
//! # Partials in per-partial directories, results written to dist/
//! bundlebars compile --partials 'partials/$0' --partials-ext .hbs -o dist pages/*.hbs
//!
//! # Precompile into a loadable bundle
//! bundlebars precompile --partials partials --wrapper json-bundle widget.hbs > widget.json
//!
//! # Read the template from stdin
//! echo '{{> greeting}}' | bundlebars compile --partials partials --partials-ext .hbs -
//! ```
//!
//! Every source is compiled by its own bundler. A failing source is reported and the
//! others still complete; the process exits with status 1 if any source failed.

pub mod build;
pub mod common;
pub mod compile;
pub mod output;
pub mod precompile;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Log filter used when neither a flag nor `RUST_LOG` selects one.
pub const DEFAULT_LOG_FILTER: &str = "bundlebars=warn";

/// Runtime settings derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Explicit log filter; `None` defers to `RUST_LOG`, then [`DEFAULT_LOG_FILTER`].
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }

    /// The filter logging is initialised with.
    pub fn env_filter(&self) -> EnvFilter {
        match &self.log_filter {
            Some(filter) => EnvFilter::new(filter),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Later calls are no-ops.
    pub fn init_logging(&self) {
        let _ = tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
            .with(self.env_filter())
            .try_init();
    }
}

/// Bundlebars command line.
#[derive(Parser, Debug)]
#[command(
    name = "bundlebars",
    about = "Compile Handlebars templates with automatic partial bundling",
    version,
    long_about = "Bundlebars renders Handlebars templates or precompiles them into portable \
                  artifacts, discovering and bundling every partial they include."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Show debug output of every pipeline stage
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render templates with data.
    Compile(compile::CompileCommand),

    /// Precompile templates and partials, optionally applying a wrapper.
    Precompile(precompile::PrecompileCommand),

    /// Build every target of a Bundlebars.toml manifest.
    Build(build::BuildCommand),
}

impl Cli {
    /// Initialise logging from the global flags and run the command.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        if self.verbose {
            CliConfig::new().with_log_filter("bundlebars=debug")
        } else if self.quiet {
            CliConfig::new().with_log_filter("error")
        } else {
            CliConfig::new()
        }
    }

    /// Run the command with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        tracing::debug!("Running with {:?}", config);

        match self.command {
            Commands::Compile(cmd) => cmd.execute().await,
            Commands::Precompile(cmd) => cmd.execute().await,
            Commands::Build(cmd) => cmd.execute().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_config() {
        let cli = Cli::parse_from(["bundlebars", "--verbose", "compile", "a.hbs"]);
        assert_eq!(cli.build_config().log_filter.as_deref(), Some("bundlebars=debug"));
    }

    #[test]
    fn test_quiet_config() {
        let cli = Cli::parse_from(["bundlebars", "build", "-q"]);
        assert_eq!(cli.build_config().log_filter.as_deref(), Some("error"));
    }

    #[test]
    fn test_default_config() {
        let cli = Cli::parse_from(["bundlebars", "compile", "a.hbs"]);
        assert_eq!(cli.build_config(), CliConfig::default());
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["bundlebars", "-v", "-q", "build"]).is_err());
    }

    #[test]
    fn test_compile_requires_sources() {
        assert!(Cli::try_parse_from(["bundlebars", "compile"]).is_err());
    }

    #[test]
    fn test_parse_compile_flags() {
        let cli = Cli::parse_from([
            "bundlebars",
            "compile",
            "--partials",
            "partials/$0",
            "--partials-ext",
            ".hbs",
            "--data",
            "data.yml",
            "-o",
            "dist",
            "a.hbs",
            "-",
        ]);
        let Commands::Compile(cmd) = cli.command else {
            panic!("expected compile");
        };
        assert_eq!(cmd.args.sources, vec!["a.hbs", "-"]);
        assert_eq!(cmd.data.as_deref(), Some(std::path::Path::new("data.yml")));
        assert_eq!(cmd.args.out.as_deref(), Some(std::path::Path::new("dist")));
    }

    #[test]
    fn test_parse_wrapper() {
        let cli = Cli::parse_from(["bundlebars", "precompile", "-w", "json-bundle", "a.hbs"]);
        let Commands::Precompile(cmd) = cli.command else {
            panic!("expected precompile");
        };
        assert_eq!(
            cmd.wrapper,
            Some(crate::pipeline::WrapperRef::Builtin(crate::pipeline::BuiltinWrapper::JsonBundle))
        );
    }
}
