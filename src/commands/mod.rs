//! Command handlers for the castplay CLI.
//!
//! Each submodule handles a specific CLI command.
//! The main dispatch logic remains in main.rs.

pub mod completions;
pub mod info;
pub mod play;

use anyhow::Result;
use std::path::Path;

/// Fail early with a readable message when a recording path is missing.
pub fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Not a file: {}", path.display());
    }
    Ok(())
}
