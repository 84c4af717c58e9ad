//! Named variable sets ("environments").

use crate::{read_json_lenient, write_json, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Variable name → value.
pub type Variables = BTreeMap<String, String>;

/// `{ "<environment>": { "<variable>": "<value>" } }` in one JSON file.
#[derive(Debug)]
pub struct EnvironmentStore {
    path: PathBuf,
    environments: BTreeMap<String, Variables>,
}

impl EnvironmentStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut store = EnvironmentStore {
            path: path.into(),
            environments: BTreeMap::new(),
        };
        store.load();
        store
    }

    pub fn load(&mut self) {
        self.environments = read_json_lenient(&self.path).unwrap_or_default();
        tracing::debug!(
            path = %self.path.display(),
            environments = self.environments.len(),
            "loaded environments"
        );
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or replace `name` and persist the whole file.
    pub fn save_environment(&mut self, name: &str, variables: Variables) -> Result<()> {
        let previous = self.environments.insert(name.to_string(), variables);
        if let Err(err) = write_json(&self.path, &self.environments) {
            match previous {
                Some(vars) => self.environments.insert(name.to_string(), vars),
                None => self.environments.remove(name),
            };
            return Err(err);
        }
        Ok(())
    }

    /// Variables of `name`; empty when the environment does not exist.
    pub fn environment(&self, name: &str) -> Variables {
        self.environments.get(name).cloned().unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.environments.contains_key(name)
    }

    /// Environment names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.environments.keys().cloned().collect()
    }
}
