//! Workspace configuration (`rpcdesk.json`).

use crate::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "rpcdesk.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Saved call list (JSON array).
    pub saved_calls_path: PathBuf,
    /// Environments (JSON object of objects).
    pub environments_path: PathBuf,
    /// grpcurl executable, looked up on `PATH` when not absolute.
    pub grpcurl_bin: PathBuf,
    /// Default for `-plaintext` when a command does not say.
    pub plaintext: bool,
    /// Environment applied when a command does not name one.
    pub default_environment: Option<String>,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            saved_calls_path: PathBuf::from("saved_calls.json"),
            environments_path: PathBuf::from("environments.json"),
            grpcurl_bin: PathBuf::from("grpcurl"),
            plaintext: false,
            default_environment: None,
        }
    }
}

impl DeskConfig {
    /// Load `path`; a missing file means defaults, a broken one is an error.
    ///
    /// Relative data paths are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: DeskConfig =
            serde_json::from_str(&contents).map_err(|e| StorageError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.saved_calls_path = rebase(base, &config.saved_calls_path);
            config.environments_path = rebase(base, &config.environments_path);
        }
        Ok(config)
    }
}

fn rebase(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
