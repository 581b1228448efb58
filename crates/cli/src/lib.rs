pub mod commands;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Read a text input fully. Missing files and invalid UTF-8 are both errors.
pub fn read_text_input(label: &str, path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read {label} at {}", path.display()))
}

/// Write an output artifact in one go.
pub fn write_output(label: &str, path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents)
        .with_context(|| format!("Failed to write {label} at {}", path.display()))?;
    log::debug!("wrote {label} to {} ({} bytes)", path.display(), contents.len());
    Ok(())
}

/// Hex SHA-256 digest of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
