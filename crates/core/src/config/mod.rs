//! Rendering configuration for the two frontends.
//!
//! Defaults reproduce the built-in behaviour; a config file only needs the
//! sections it overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for loading a [`ToolConfig`] from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON config {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML config {}: {source}", .path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Only `.json`, `.yaml` and `.yml` files are understood.
    #[error("Unsupported config format for {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Limits applied when lowering a whole function body.
///
/// Both fields are required when a section appears in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoweringConfig {
    /// Produced lines kept per function before the "omitted" comment.
    pub max_lines: usize,
    /// Emit `// Basic block N:` comments at block labels.
    pub emit_block_labels: bool,
}

impl LoweringConfig {
    /// Profile used by the HTML comparison report.
    pub fn report() -> Self {
        Self { max_lines: 20, emit_block_labels: false }
    }

    /// Profile used by the standalone source converter.
    pub fn standalone() -> Self {
        Self { max_lines: 30, emit_block_labels: true }
    }
}

/// Settings shared by `report-tool` and `ir-to-source-tool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub report: LoweringConfig,
    pub source: LoweringConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self { report: LoweringConfig::report(), source: LoweringConfig::standalone() }
    }
}

impl ToolConfig {
    /// Load from a JSON or YAML file, chosen by extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_lowercase();
        if !matches!(ext.as_str(), "json" | "yaml" | "yml") {
            return Err(ConfigError::UnsupportedFormat(path.to_path_buf()));
        }
        let body = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        if ext == "json" {
            serde_json::from_str(&body)
                .map_err(|source| ConfigError::Json { path: path.to_path_buf(), source })
        } else {
            serde_yaml::from_str(&body)
                .map_err(|source| ConfigError::Yaml { path: path.to_path_buf(), source })
        }
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
