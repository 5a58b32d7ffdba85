//! Writing compilation results to stdout or an output directory.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::info;

use super::common::STDIN_SOURCE;
use crate::utils::fs::write_output;

/// File name used for results of templates read from stdin.
pub const STDIN_OUTPUT_NAME: &str = "bb.out";

/// Destination of the result for `src` inside `out`.
///
/// The file keeps the base name of the source, so `pages/index.hbs` lands at
/// `<out>/index.hbs`.
#[must_use]
pub fn output_path(src: &str, out: &Path) -> PathBuf {
    let name = if src == STDIN_SOURCE {
        PathBuf::from(STDIN_OUTPUT_NAME)
    } else {
        Path::new(src).file_name().map_or_else(|| PathBuf::from(STDIN_OUTPUT_NAME), PathBuf::from)
    };
    out.join(name)
}

/// Write `result` for `src` to stdout, or into `out` when given.
///
/// # Errors
///
/// Returns an error if the output directory or file cannot be written.
pub async fn write_result(src: &str, result: &str, out: Option<&Path>) -> Result<()> {
    let Some(out) = out else {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(result.as_bytes()).await.context("Failed to write to stdout")?;
        stdout.flush().await.context("Failed to flush stdout")?;
        return Ok(());
    };

    write_file(&output_path(src, out), result.to_string()).await
}

/// Write `result` to an explicit destination file, as used by manifest builds.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub async fn write_file(dest: &Path, result: String) -> Result<()> {
    write_output(dest, result).await?;
    info!("Wrote {}", dest.display());
    println!("Writing result to {}...{}", dest.display().to_string().cyan(), "OK".green());
    Ok(())
}
