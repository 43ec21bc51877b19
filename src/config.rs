//! Optional TOML configuration.
//!
//! Looked up in `./dump_ast.toml`, then `<config dir>/dump_ast/config.toml`.
//! Every key has a default, so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AstError, AstResult};

/// Local configuration file name.
pub const LOCAL_CONFIG: &str = "dump_ast.toml";

/// Default writer capacity (4 MiB).
pub const DEFAULT_MAX_BYTES: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub fixtures: FixtureConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Maximum size of one JSON document in bytes.
    pub max_bytes: usize,
    /// Spaces per nesting level.
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            indent: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FixtureConfig {
    pub dir: PathBuf,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("ast-tests"),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> AstResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| AstError::Config(e.to_string()))?;
        if config.output.max_bytes == 0 {
            return Err(AstError::Config("output.max_bytes must be positive".into()));
        }
        Ok(config)
    }

    /// Read configuration from a file.
    pub fn from_path(path: &Path) -> AstResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the first configuration file found, or the defaults.
    pub fn load() -> AstResult<Self> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("dump_ast").join("config.toml"));
        }
        paths
    }
}
