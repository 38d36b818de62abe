//! Cache traits for response memoization.

use std::time::Duration;

use bytes::Bytes;
use derive_more::{Debug, Display, Error};

/// Error type for cache operations.
#[derive(Debug, Display, Error)]
#[display("cache error: {_0}")]
#[error(ignore)]
pub struct CacheError(pub String);

/// Point-in-time summary of a cache's contents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of stored entries, expired ones included until they are looked up.
    pub entries: usize,
    /// Sum of stored payload sizes in bytes.
    pub size_bytes: usize,
    /// Age of the most recent insertion, if any.
    pub newest_age: Option<Duration>,
}

/// Core cache trait for get/put/clear operations.
///
/// Expiry is lazy: an entry whose age has reached its time-to-live is treated
/// as absent by `get`, there is no background sweep.
pub trait Cache: Send + Sync + 'static {
    /// Get a live value from the cache.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Bytes>, CacheError>> + Send;

    /// Put a value into the cache with a TTL, replacing any previous entry.
    fn put(
        &self,
        key: &str,
        value: Bytes,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<(), CacheError>> + Send;

    /// Delete a value from the cache.
    fn delete(&self, key: &str)
    -> impl std::future::Future<Output = Result<(), CacheError>> + Send;

    /// Remove every entry unconditionally.
    fn clear(&self) -> impl std::future::Future<Output = Result<(), CacheError>> + Send;

    /// Summarize the current contents.
    fn stats(&self) -> impl std::future::Future<Output = Result<CacheStats, CacheError>> + Send;
}
