//! Storage backends.
//!
//! The store talks to browser local storage (or any other key-value
//! host facility) through [`StorageBackend`]. The crate ships an
//! in-memory implementation; a wasm shell provides its own adapter over
//! the real browser API.

use std::collections::HashMap;
use thiserror::Error;

/// Errors a backend write can raise.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The host storage is full. Maps to the browser's
    /// QuotaExceededError / NS_ERROR_DOM_QUOTA_REACHED family.
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    #[error("Backend error: {0}")]
    Backend(String),
}

/// String-keyed, string-valued storage with the browser local-storage
/// contract: reads are infallible, writes can hit a quota.
pub trait StorageBackend {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str);
}

/// In-memory backend with an optional byte quota.
///
/// The quota counts key and value bytes, with the entry being replaced
/// excluded, matching how browsers account a same-key overwrite.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn used_bytes_excluding(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_excluding(key) + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}
