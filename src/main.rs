//! Bundlebars CLI entry point
//!
//! Parses the command line, initialises logging and runs the selected command:
//! - `compile` - render templates with data
//! - `precompile` - serialize templates and partials, optionally wrapped
//! - `build` - run the targets of a `Bundlebars.toml` manifest
//!
//! Any failure is printed with suggestions and exits with status 1.

use anyhow::Result;
use bundlebars::cli;
use bundlebars::core::user_friendly_error;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
