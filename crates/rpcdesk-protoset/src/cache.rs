//! Content-addressed parse cache.
//!
//! Keys are the SHA-256 of the raw protoset bytes, so a file rewritten in
//! place misses the cache and identical bytes under different paths share one
//! entry. Failures are never cached.

use crate::model::DescriptorSet;
use crate::{parse, ProtosetError};
use parking_lot::Mutex;
use sha2::{Digest as _, Sha256};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub type ContentKey = [u8; 32];

#[derive(Debug, Default)]
pub struct ProtosetCache {
    entries: Mutex<HashMap<ContentKey, Arc<DescriptorSet>>>,
}

impl ProtosetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_key(bytes: &[u8]) -> ContentKey {
        let digest = Sha256::digest(bytes);
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        key
    }

    /// Parse `bytes`, or return the set already parsed from identical bytes.
    pub fn get_or_parse(&self, bytes: &[u8]) -> Result<Arc<DescriptorSet>, ProtosetError> {
        let key = Self::content_key(bytes);
        if let Some(hit) = self.entries.lock().get(&key) {
            tracing::debug!(key = %short_hex(&key), "protoset cache hit");
            return Ok(Arc::clone(hit));
        }

        // Parse outside the lock.
        let set = Arc::new(parse(bytes)?);
        self.entries.lock().insert(key, Arc::clone(&set));
        Ok(set)
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<DescriptorSet>, ProtosetError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| ProtosetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.get_or_parse(&bytes)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

fn short_hex(key: &ContentKey) -> String {
    let mut out = String::with_capacity(16);
    for b in key[..8].iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
