//! File-backed cache store
//!
//! Keeps the whole cache as one JSON object on disk. The document is loaded
//! lazily on first access and rewritten after every `set`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{CacheError, CacheStore};

/// Cache store persisted to a single JSON document
///
/// A missing or malformed document starts the cache empty. Failed writes are
/// reported to the caller but the in-memory mapping keeps the new value, so the
/// cache degrades to a non-persistent one instead of failing.
#[derive(Debug)]
pub struct FileCache {
    /// Location of the JSON document
    path: PathBuf,
    /// In-memory mapping; `None` until the document has been loaded
    entries: Mutex<Option<Map<String, Value>>>,
    /// Serializes writes to disk so the last `set` is the last one persisted
    write_lock: Mutex<()>,
}

impl FileCache {
    /// Creates a store backed by the document at `path`
    ///
    /// Nothing is read until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Mutex::new(None),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the location of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against the loaded mapping, loading it first if needed
    fn with_entries<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> R {
        let mut guard = self.entries.lock();
        let entries = guard.get_or_insert_with(|| load_document(&self.path));
        f(entries)
    }

    /// Writes the serialized mapping to disk, creating parent directories
    fn persist(&self, json: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)
    }
}

/// Reads the cache document, treating any failure as an empty cache
fn load_document(path: &Path) -> Map<String, Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "cache file unreadable, starting empty"
            );
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(map)) => {
            tracing::debug!(path = %path.display(), entries = map.len(), "loaded cache file");
            map
        }
        Ok(_) => {
            tracing::warn!(
                path = %path.display(),
                "cache file is not a JSON object, starting empty"
            );
            Map::new()
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "cache file is malformed, starting empty"
            );
            Map::new()
        }
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        let _write = self.write_lock.lock();

        let json = self.with_entries(|entries| {
            entries.insert(key.to_string(), value);
            serde_json::to_string_pretty(&*entries)
        })?;

        self.persist(&json)?;
        Ok(())
    }

    fn set_many(&self, batch: Vec<(String, Value)>) -> Result<(), CacheError> {
        let _write = self.write_lock.lock();

        let json = self.with_entries(|entries| {
            entries.extend(batch);
            serde_json::to_string_pretty(&*entries)
        })?;

        self.persist(&json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        let _write = self.write_lock.lock();
        *self.entries.lock() = Some(Map::new());

        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::Persist(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    fn create_test_cache() -> (FileCache, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = FileCache::new(temp_dir.path().join("cache.json"));
        (cache, temp_dir)
    }

    #[test]
    fn test_get_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();

        assert!(cache.get("nonexistent_key").is_none());
    }

    #[test]
    fn test_set_creates_document() {
        let (cache, temp_dir) = create_test_cache();

        cache.set("char_1", json!({"name": "A-Bomb"})).expect("Write should succeed");

        let expected_path = temp_dir.path().join("cache.json");
        assert!(expected_path.exists(), "Cache file should exist");

        let content = fs::read_to_string(&expected_path).expect("Should read file");
        let doc: Value = serde_json::from_str(&content).expect("File should hold JSON");
        assert_eq!(doc["char_1"]["name"], "A-Bomb");
    }

    #[test]
    fn test_round_trip_through_fresh_instance() {
        let (cache, temp_dir) = create_test_cache();
        cache.set("k", json!({"a": 1})).expect("Write should succeed");

        let reloaded = FileCache::new(temp_dir.path().join("cache.json"));

        assert_eq!(reloaded.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn test_clear_removes_file_and_entries() {
        let (cache, temp_dir) = create_test_cache();
        cache.set("k", json!(1)).unwrap();
        cache.set_hero_list(vec![json!({"id": "1"})]).unwrap();

        cache.clear().expect("Clear should succeed");

        assert!(!temp_dir.path().join("cache.json").exists());
        assert!(cache.get("k").is_none());
        assert!(cache.get_hero_list().is_none());

        let reloaded = FileCache::new(temp_dir.path().join("cache.json"));
        assert!(reloaded.get("k").is_none());
    }

    #[test]
    fn test_clear_without_file_is_ok() {
        let (cache, _temp_dir) = create_test_cache();

        assert!(cache.clear().is_ok());
    }

    #[test]
    fn test_malformed_document_starts_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();

        let cache = FileCache::new(&path);
        assert!(cache.get("anything").is_none());

        cache.set("k", json!("v")).expect("Write should replace the bad document");
        assert_eq!(FileCache::new(&path).get("k"), Some(json!("v")));
    }

    #[test]
    fn test_non_object_document_starts_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("cache.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let cache = FileCache::new(&path);

        assert!(cache.get("0").is_none());
    }

    #[test]
    fn test_document_loaded_only_once() {
        let (cache, temp_dir) = create_test_cache();
        cache.set("k", json!("first")).unwrap();

        // Changes made behind the store's back are not re-read
        fs::write(temp_dir.path().join("cache.json"), r#"{"k": "outside"}"#).unwrap();

        assert_eq!(cache.get("k"), Some(json!("first")));
    }

    #[test]
    fn test_write_failure_keeps_value_in_memory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        // A directory at the document path makes every write fail
        let path = temp_dir.path().join("cache.json");
        fs::create_dir(&path).unwrap();
        let cache = FileCache::new(&path);

        let result = cache.set("k", json!({"a": 1}));

        assert!(matches!(result, Err(CacheError::Persist(_))));
        assert_eq!(cache.get("k"), Some(json!({"a": 1})));
    }

    #[test]
    fn test_set_creates_missing_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested").join("dir").join("cache.json");
        let cache = FileCache::new(&path);

        cache.set("k", json!(true)).expect("Write should succeed");

        assert!(path.exists(), "Nested cache file should be created");
    }

    #[test]
    fn test_last_write_wins() {
        let (cache, temp_dir) = create_test_cache();

        cache.set("k", json!("first")).unwrap();
        cache.set("k", json!("second")).unwrap();

        assert_eq!(cache.get("k"), Some(json!("second")));
        let reloaded = FileCache::new(temp_dir.path().join("cache.json"));
        assert_eq!(reloaded.get("k"), Some(json!("second")));
    }

    #[test]
    fn test_set_many_persists_batch() {
        let (cache, temp_dir) = create_test_cache();
        cache.set("existing", json!(0)).unwrap();

        cache
            .set_many(vec![
                ("char_1".to_string(), json!({"id": 1})),
                ("char_2".to_string(), json!({"id": 2})),
                ("char_1".to_string(), json!({"id": "1"})),
            ])
            .expect("Batch write should succeed");

        let reloaded = FileCache::new(temp_dir.path().join("cache.json"));
        assert_eq!(reloaded.get("existing"), Some(json!(0)));
        assert_eq!(reloaded.get("char_1"), Some(json!({"id": "1"})));
        assert_eq!(reloaded.get("char_2"), Some(json!({"id": 2})));
    }

    #[test]
    fn test_concurrent_writers_all_persist() {
        let (cache, temp_dir) = create_test_cache();
        let cache = Arc::new(cache);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    cache.set(&format!("char_{}", i), json!(i)).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reloaded = FileCache::new(temp_dir.path().join("cache.json"));
        for i in 0..8 {
            assert_eq!(reloaded.get(&format!("char_{}", i)), Some(json!(i)));
        }
    }
}
