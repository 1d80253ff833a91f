//! Managed cache store over a shared in-process cache service
//!
//! [`SharedCache`] plays the role of an externally configured cache: bounded
//! in size, with a per-entry expiry, and shareable between unrelated users.
//! [`ManagedCache`] is the store the client talks to; it namespaces every key
//! and applies one fixed time-to-live to everything it writes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use super::{CacheError, CacheStore};

/// A stored value and the moment it stops being served
#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(expires_at) if now >= expires_at)
    }
}

/// Capacity-bounded key-value cache with per-entry expiry
#[derive(Debug)]
pub struct SharedCache {
    entries: Mutex<HashMap<String, Entry>>,
    max_entries: usize,
}

impl SharedCache {
    /// Creates an empty cache holding at most `max_entries` values
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// Returns the live value under `key`, dropping it if it has expired
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock();
        let now = Utc::now();

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.remove(key);
        }
        None
    }

    /// Stores `value` under `key`
    ///
    /// `ttl` of `None`, or one reaching past the latest representable time,
    /// never expires.
    pub fn set(&self, key: &str, value: Value, ttl: Option<Duration>) {
        let mut entries = self.entries.lock();
        let now = Utc::now();

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| !entry.is_expired(now));
            if entries.len() >= self.max_entries {
                evict_soonest_expiring(&mut entries);
            }
        }

        entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: ttl.and_then(|ttl| now.checked_add_signed(ttl)),
            },
        );
    }

    /// Removes every entry
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

/// Drops the entry that would expire first; entries without expiry go last
fn evict_soonest_expiring(entries: &mut HashMap<String, Entry>) {
    let victim = entries
        .iter()
        .min_by_key(|(_, entry)| (entry.expires_at.is_none(), entry.expires_at))
        .map(|(key, _)| key.clone());

    if let Some(key) = victim {
        tracing::debug!(key = %key, "cache full, evicting entry");
        entries.remove(&key);
    }
}

/// Namespaced, fixed-TTL view of a [`SharedCache`]
#[derive(Debug, Clone)]
pub struct ManagedCache {
    service: Arc<SharedCache>,
    prefix: String,
    ttl: Option<Duration>,
}

impl ManagedCache {
    /// Creates a store writing into `service` under `prefix`
    pub fn new(
        service: Arc<SharedCache>,
        prefix: impl Into<String>,
        ttl: Option<Duration>,
    ) -> Self {
        Self {
            service,
            prefix: prefix.into(),
            ttl,
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}:{}", self.prefix, name)
    }
}

impl CacheStore for ManagedCache {
    fn get(&self, key: &str) -> Option<Value> {
        self.service.get(&self.key(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), CacheError> {
        self.service.set(&self.key(key), value, self.ttl);
        Ok(())
    }

    /// Clears the whole underlying service, other namespaces included
    fn clear(&self) -> Result<(), CacheError> {
        self.service.clear();
        Ok(())
    }
}
