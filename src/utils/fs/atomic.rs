//! Atomic file writes for compilation output.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically writes `content` to `path` using a write-then-rename strategy.
///
/// The content is written to a temporary file in the destination directory, synced,
/// and then persisted over `path`, so readers never observe a partially written
/// output. Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or any write step fails.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(&parent)
        .with_context(|| format!("Failed to create temp file in: {}", parent.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write temp file for: {}", path.display()))?;
    file.as_file().sync_all().context("Failed to sync file to disk")?;

    file.persist(path)
        .with_context(|| format!("Failed to move temp file to: {}", path.display()))?;

    Ok(())
}

/// Async wrapper around [`atomic_write`] for use inside the runtime.
///
/// # Errors
///
/// Returns an error if the write fails or the blocking task panics.
pub async fn write_output(path: &Path, content: String) -> Result<()> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || atomic_write(&path, content.as_bytes()))
        .await
        .context("Output writer task failed")?
}
