//! Saved call definitions.

use crate::{read_json_lenient, write_json, Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Everything needed to reissue a call.
///
/// Every key is optional on disk so that records written by older versions
/// (or by hand) still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedCall {
    pub port_forward: String,
    pub cookie: String,
    pub bearer_token: String,
    pub protoset: String,
    pub server: String,
    /// Fully-qualified method (`pkg.Service.Method`).
    #[serde(alias = "call")]
    pub method: String,
    pub plaintext: bool,
    /// Serialized JSON request body; empty when the call sends none.
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SavedCall {
    /// One-line summary used in saved-call listings.
    pub fn display_text(&self) -> String {
        let body = if self.body.is_empty() { "No" } else { "Yes" };
        let text = format!("{} - {} - Body: {}", self.server, self.method, body);
        match self.label.as_deref().filter(|l| !l.is_empty()) {
            Some(label) => format!("[{label}] {text}"),
            None => text,
        }
    }
}

/// An ordered collection of saved calls, addressed by position.
pub trait CallRepository {
    /// (Re)read the backing store. Never fails: unreadable data is empty.
    fn load(&mut self) -> &[SavedCall];

    fn calls(&self) -> &[SavedCall];

    /// Append and persist; returns the new record's index.
    fn append(&mut self, call: SavedCall) -> Result<usize>;

    /// Replace the record at `index` and persist.
    fn update(&mut self, index: usize, call: SavedCall) -> Result<()>;

    fn get(&self, index: usize) -> Option<&SavedCall> {
        self.calls().get(index)
    }

    fn len(&self) -> usize {
        self.calls().len()
    }

    fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }
}

// ============================================================================
// JSON file store
// ============================================================================

/// Saved calls kept as a pretty-printed JSON array in one file.
#[derive(Debug)]
pub struct JsonCallStore {
    path: PathBuf,
    calls: Vec<SavedCall>,
}

impl JsonCallStore {
    /// Open `path` and load whatever it currently holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = JsonCallStore {
            path: path.into(),
            calls: Vec::new(),
        };
        store.load();
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        write_json(&self.path, &self.calls)
    }
}

impl CallRepository for JsonCallStore {
    fn load(&mut self) -> &[SavedCall] {
        self.calls = read_json_lenient(&self.path).unwrap_or_default();
        tracing::debug!(path = %self.path.display(), calls = self.calls.len(), "loaded saved calls");
        &self.calls
    }

    fn calls(&self) -> &[SavedCall] {
        &self.calls
    }

    fn append(&mut self, call: SavedCall) -> Result<usize> {
        self.calls.push(call);
        if let Err(err) = self.persist() {
            self.calls.pop();
            return Err(err);
        }
        Ok(self.calls.len() - 1)
    }

    fn update(&mut self, index: usize, call: SavedCall) -> Result<()> {
        let len = self.calls.len();
        let slot = self
            .calls
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange { index, len })?;
        let previous = std::mem::replace(slot, call);
        if let Err(err) = self.persist() {
            self.calls[index] = previous;
            return Err(err);
        }
        Ok(())
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Non-persistent repository with the same indexing rules as the file store.
#[derive(Debug, Default, Clone)]
pub struct MemoryCallStore {
    calls: Vec<SavedCall>,
}

impl MemoryCallStore {
    pub fn new(calls: Vec<SavedCall>) -> Self {
        MemoryCallStore { calls }
    }
}

impl CallRepository for MemoryCallStore {
    fn load(&mut self) -> &[SavedCall] {
        &self.calls
    }

    fn calls(&self) -> &[SavedCall] {
        &self.calls
    }

    fn append(&mut self, call: SavedCall) -> Result<usize> {
        self.calls.push(call);
        Ok(self.calls.len() - 1)
    }

    fn update(&mut self, index: usize, call: SavedCall) -> Result<()> {
        let len = self.calls.len();
        let slot = self
            .calls
            .get_mut(index)
            .ok_or(StorageError::IndexOutOfRange { index, len })?;
        *slot = call;
        Ok(())
    }
}
