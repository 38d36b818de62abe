//! In-memory TTL cache implementation.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
    time::{Duration, Instant},
};

use bytes::Bytes;
use siga_traits::{Cache, CacheError, CacheStats, Clock, SystemClock};

/// Entry in the memory cache.
struct CacheEntry {
    value: Bytes,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_live(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.inserted_at) < self.ttl
    }
}

/// In-memory cache with lazy expiry.
///
/// Expired entries stay in the map until the next lookup of their key finds
/// them and removes them.
pub struct MemoryCache<K = SystemClock> {
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: K,
}

impl MemoryCache {
    /// Create an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clock> MemoryCache<K> {
    /// Create an empty cache reading time from `clock`.
    pub fn with_clock(clock: K) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, CacheEntry>>, CacheError> {
        self.entries.lock().map_err(|e| CacheError(format!("lock poisoned: {}", e)))
    }
}

impl<K> std::fmt::Debug for MemoryCache<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache").finish_non_exhaustive()
    }
}

impl<K: Clock> Cache for MemoryCache<K> {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let now = self.clock.now();
        let mut entries = self.lock()?;

        if let Some(entry) = entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
            entries.remove(key);
        }

        Ok(None)
    }

    async fn put(&self, key: &str, value: Bytes, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry { value, inserted_at: self.clock.now(), ttl };
        self.lock()?.insert(key.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats, CacheError> {
        let now = self.clock.now();
        let entries = self.lock()?;

        Ok(CacheStats {
            entries: entries.len(),
            size_bytes: entries.values().map(|e| e.value.len()).sum(),
            newest_age: entries
                .values()
                .map(|e| e.inserted_at)
                .max()
                .map(|at| now.saturating_duration_since(at)),
        })
    }
}
