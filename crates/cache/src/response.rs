//! Cached-or-fetch wrapper over a [`Cache`].

use std::{future::Future, sync::Arc, time::Duration};

use bytes::Bytes;
use serde::{Serialize, de::DeserializeOwned};
use siga_traits::{Cache, CacheError, CacheStats};
use siga_types::{LookupResponse, SearchResponse, SigaError};

use crate::{memory::MemoryCache, signature::RequestSignature};

/// Decides whether a fetched response may be memoized.
pub trait Cacheable {
    /// `true` when the response may be stored.
    fn is_cacheable(&self) -> bool;
}

impl Cacheable for SearchResponse {
    fn is_cacheable(&self) -> bool {
        SearchResponse::is_cacheable(self)
    }
}

impl Cacheable for LookupResponse {
    fn is_cacheable(&self) -> bool {
        self.success
    }
}

/// Memoizes typed responses under their [`RequestSignature`].
///
/// Cache failures never fail a request: a failed read is treated as a miss
/// and a failed write only loses the memo.
#[derive(Debug)]
pub struct ResponseCache<C = MemoryCache> {
    cache: Arc<C>,
    ttl: Duration,
    enabled: bool,
}

impl<C> Clone for ResponseCache<C> {
    fn clone(&self) -> Self {
        Self { cache: Arc::clone(&self.cache), ttl: self.ttl, enabled: self.enabled }
    }
}

impl<C: Cache> ResponseCache<C> {
    /// Wrap `cache`, storing entries for `ttl`.
    pub fn new(cache: C, ttl: Duration) -> Self {
        Self { cache: Arc::new(cache), ttl, enabled: true }
    }

    /// Turn memoization on or off. When off every call fetches.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Configured time-to-live.
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The underlying cache.
    pub fn inner(&self) -> &C {
        &self.cache
    }

    /// Return the live entry for `signature`, or run `fetcher` and store its
    /// result when it is [`Cacheable`].
    pub async fn cached_or_fetch<T, F, Fut>(
        &self,
        signature: &RequestSignature,
        fetcher: F,
    ) -> Result<T, SigaError>
    where
        T: Cacheable + Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, SigaError>>,
    {
        if self.enabled {
            if let Some(hit) = self.lookup(signature).await {
                return Ok(hit);
            }
        }

        let fresh = fetcher().await?;

        if self.enabled && fresh.is_cacheable() {
            self.store(signature, &fresh).await;
        }
        Ok(fresh)
    }

    async fn lookup<T: DeserializeOwned>(&self, signature: &RequestSignature) -> Option<T> {
        match self.cache.get(signature.as_str()).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(value) => {
                    debug!(key = %signature, "cache hit");
                    Some(value)
                }
                Err(e) => {
                    warn!(key = %signature, error = %e, "discarding undecodable cache entry");
                    if let Err(e) = self.cache.delete(signature.as_str()).await {
                        warn!(key = %signature, error = %e, "failed to drop undecodable cache entry");
                    }
                    None
                }
            },
            Ok(None) => {
                trace!(key = %signature, "cache miss");
                None
            }
            Err(e) => {
                warn!(key = %signature, error = %e, "cache read failed");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, signature: &RequestSignature, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => Bytes::from(bytes),
            Err(e) => {
                warn!(key = %signature, error = %e, "failed to encode response for cache");
                return;
            }
        };
        match self.cache.put(signature.as_str(), bytes, self.ttl).await {
            Ok(()) => debug!(key = %signature, "cached response"),
            Err(e) => warn!(key = %signature, error = %e, "cache write failed"),
        }
    }

    /// Drop every memoized response.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.cache.clear().await?;
        info!("cache cleared");
        Ok(())
    }

    /// Summary of the memoized responses.
    pub async fn stats(&self) -> Result<CacheStats, CacheError> {
        self.cache.stats().await
    }
}
