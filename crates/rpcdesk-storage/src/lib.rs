//! rpcdesk storage layer
//!
//! Everything rpcdesk keeps on disk is a small JSON document next to the
//! user's work:
//!
//! ```text
//! rpcdesk.json        DeskConfig       where the other two live, grpcurl path
//! saved_calls.json    [SavedCall, ..]  ordered list, edited by index
//! environments.json   {env: {k: v}}    variables for `{{name}}` substitution
//! ```
//!
//! Loading is forgiving: a missing or corrupt saved-calls/environments file
//! reads as empty (and is logged). Every failed save is returned to the
//! caller and leaves the in-memory state as it was.

pub mod calls;
pub mod config;
pub mod environments;


pub use calls::{CallRepository, JsonCallStore, MemoryCallStore, SavedCall};
pub use config::{DeskConfig, DEFAULT_CONFIG_FILE};
pub use environments::{EnvironmentStore, Variables};

use std::path::{Path, PathBuf};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("invalid saved call index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

// ============================================================================
// JSON file helpers
// ============================================================================

/// Read a JSON document, treating "absent", "unreadable" and "not valid JSON
/// of this shape" alike as `None`.
pub(crate) fn read_json_lenient<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read, treating as empty");
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to parse, treating as empty");
            None
        }
    }
}

/// Pretty-print `value` to `path`, surfacing every failure.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
