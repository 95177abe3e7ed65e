//! [`CacheStore`] persisted to a JSON file.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use svd_core::CacheStore;
use tempfile::NamedTempFile;

use crate::ClientError;

/// A cache kept in memory and written back to a JSON object file after
/// every insert.
///
/// Write failures are logged and otherwise ignored; the in-memory copy
/// stays authoritative for the rest of the process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
}

impl FileStore {
    /// Open `path`, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| ClientError::StoreFormat {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(ClientError::StoreIo { path, source }),
        };
        tracing::debug!(path = %path.display(), entries = entries.len(), "opened cache file");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn persist(&self, entries: &BTreeMap<String, Value>) -> Result<(), ClientError> {
        let io_err = |source: io::Error| ClientError::StoreIo {
            path: self.path.clone(),
            source,
        };
        let text = serde_json::to_string_pretty(entries).map_err(|source| {
            ClientError::StoreFormat {
                path: self.path.clone(),
                source,
            }
        })?;
        let dir = match self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            Some(dir) => {
                fs::create_dir_all(dir).map_err(io_err)?;
                dir
            }
            None => Path::new("."),
        };
        // Unique name per write; the rename replaces the file atomically.
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: Value) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value);
        if let Err(e) = self.persist(&entries) {
            tracing::warn!(error = %e, "could not write cache file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_file_starts_empty_and_is_created_on_put() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");
        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());

        store.put("cached_command_detail_ping", json!({"name": "ping"}));
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.len(), 1);
        assert_eq!(
            reopened.get("cached_command_detail_ping"),
            Some(json!({"name": "ping"}))
        );
    }

    #[test]
    fn writers_sharing_a_path_leave_only_the_cache_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        let a = FileStore::open(&path).unwrap();
        let b = FileStore::open(&path).unwrap();

        std::thread::scope(|s| {
            s.spawn(|| {
                for i in 0..20 {
                    a.put(&format!("a{i}"), json!(i));
                }
            });
            s.spawn(|| {
                for i in 0..20 {
                    b.put(&format!("b{i}"), json!(i));
                }
            });
        });

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["cache.json"]);
        // Whichever writer finished last, the file is whole.
        assert_eq!(FileStore::open(&path).unwrap().len(), 20);
    }

    #[test]
    fn empty_file_is_an_empty_cache() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(FileStore::open(file.path()).unwrap().is_empty());
    }

    #[test]
    fn non_object_file_is_rejected() {
        let file = tempfile::NamedTempFile::new().unwrap();
        fs::write(file.path(), "[1, 2]").unwrap();
        assert!(matches!(
            FileStore::open(file.path()),
            Err(ClientError::StoreFormat { .. })
        ));
    }
}
