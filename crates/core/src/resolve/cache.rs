//! Keyed cache for resolved command metadata and alias definitions.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

/// A keyed JSON store that resolved definitions are cached in.
///
/// Created once per process (or session) and handed to the
/// [`Resolver`](super::Resolver). Entries are only ever added; writing an
/// existing key replaces it with an equal value, so concurrent first
/// lookups may both fetch and both store.
pub trait CacheStore: Send + Sync {
    /// Read an entry.
    fn get(&self, key: &str) -> Option<Value>;
    /// Store an entry.
    fn put(&self, key: &str, value: Value);
}

/// Cache key for a command's metadata; `name` is already lower-cased.
pub fn command_key(name: &str) -> String {
    format!("cached_command_detail_{name}")
}

/// Cache key for an alias definition.
pub fn alias_key(user: &str, name: &str) -> String {
    format!("cached_alias_user:{user}_alias:{name}")
}

/// In-memory [`CacheStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The cached keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: Value) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value);
    }
}
