//! Key-value cache stores for upstream superhero data
//!
//! Both backends implement [`CacheStore`]: a persistent JSON-file store
//! ([`FileCache`]) and a namespaced, TTL-bound store over an in-process cache
//! service ([`ManagedCache`]). The backend is picked once at startup from a
//! [`CacheConfig`] and injected into the client.

mod file;
mod managed;

pub use file::FileCache;
pub use managed::{ManagedCache, SharedCache};

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use directories::ProjectDirs;
use serde_json::Value;
use thiserror::Error;

/// Reserved key holding the hero-list snapshot.
///
/// Per-character entries always start with a field-group prefix such as
/// `char_`, so no character id can produce this key.
pub const HERO_LIST_KEY: &str = "__hero_list__";

/// File name used for the file-backed cache
const CACHE_FILE_NAME: &str = "superhero_cache.json";

/// Errors reported by cache writes
///
/// Callers treat these as degradations, never as request failures.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backing document could not be written or removed
    #[error("Failed to persist cache: {0}")]
    Persist(#[from] std::io::Error),

    /// The in-memory mapping could not be serialized
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Storage contract shared by every cache backend and test double
pub trait CacheStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: Value) -> Result<(), CacheError>;

    /// Stores several entries; later pairs win over earlier ones
    ///
    /// Backends with expensive writes override this to persist once.
    fn set_many(&self, entries: Vec<(String, Value)>) -> Result<(), CacheError> {
        for (key, value) in entries {
            self.set(&key, value)?;
        }
        Ok(())
    }

    /// Removes every entry this store can reach
    fn clear(&self) -> Result<(), CacheError>;

    /// Returns the cached hero-list snapshot
    fn get_hero_list(&self) -> Option<Vec<Value>> {
        match self.get(HERO_LIST_KEY)? {
            Value::Array(heroes) => Some(heroes),
            _ => None,
        }
    }

    /// Stores the hero-list snapshot
    fn set_hero_list(&self, heroes: Vec<Value>) -> Result<(), CacheError> {
        self.set(HERO_LIST_KEY, Value::Array(heroes))
    }
}

/// Available cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// Persistent JSON document on disk
    File,
    /// Process-local cache service with expiry
    Memory,
}

impl CacheBackend {
    /// Parses a backend name as given on the command line
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "file" | "json" => Some(CacheBackend::File),
            "memory" | "mem" | "locmem" => Some(CacheBackend::Memory),
            _ => None,
        }
    }
}

/// Settings used to build a cache store
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Which backend to construct
    pub backend: CacheBackend,
    /// Namespace prepended to keys by the managed backend
    pub prefix: String,
    /// Time-to-live for managed entries; `None` keeps entries forever
    pub ttl: Option<Duration>,
    /// Capacity of the managed cache service
    pub max_entries: usize,
    /// Location of the file-backed cache document
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            prefix: "superhero_api".to_string(),
            ttl: Some(Duration::hours(24)),
            max_entries: 10_000,
            path: default_cache_path(),
        }
    }
}

/// Returns the default location of the file-backed cache
///
/// Uses the XDG cache directory (`~/.cache/capecache/` on Linux) and falls
/// back to the working directory when no home directory is available.
pub fn default_cache_path() -> PathBuf {
    match ProjectDirs::from("", "", "capecache") {
        Some(dirs) => dirs.cache_dir().join(CACHE_FILE_NAME),
        None => PathBuf::from(format!(".{}", CACHE_FILE_NAME)),
    }
}

/// Builds the cache store selected by `config`
pub fn open_store(config: &CacheConfig) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::File => {
            tracing::debug!(path = %config.path.display(), "using file cache");
            Arc::new(FileCache::new(config.path.clone()))
        }
        CacheBackend::Memory => {
            tracing::debug!(prefix = %config.prefix, "using managed memory cache");
            let service = Arc::new(SharedCache::new(config.max_entries));
            Arc::new(ManagedCache::new(service, config.prefix.clone(), config.ttl))
        }
    }
}
