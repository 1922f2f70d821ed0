use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone, Debug)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: Instant,
    pub expiry: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T, ttl: Duration) -> Self {
        let timestamp = Instant::now();
        Self {
            data,
            timestamp,
            expiry: timestamp + ttl,
        }
    }

    pub fn is_valid(&self) -> bool {
        Instant::now() < self.expiry
    }
}

/// Expired entries are never swept; they stay readable through `get_stale`
/// until overwritten.
#[derive(Debug)]
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    // One async lock per key so concurrent misses share a single factory call.
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    default_ttl: Duration,
}

impl<T: Clone> Default for TtlCache<T> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl<T: Clone> TtlCache<T> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }

    /// The stored value if it has not expired yet.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries();
        match entries.get(key) {
            Some(entry) if entry.is_valid() => {
                trace!(key, "cache hit");
                Some(entry.data.clone())
            }
            Some(_) => {
                trace!(key, "cache entry expired");
                None
            }
            None => None,
        }
    }

    /// The last stored value regardless of expiry.
    pub fn get_stale(&self, key: &str) -> Option<T> {
        self.entries().get(key).map(|entry| entry.data.clone())
    }

    pub fn entry(&self, key: &str) -> Option<CacheEntry<T>> {
        self.entries().get(key).cloned()
    }

    pub fn set(&self, key: impl Into<String>, value: T) {
        self.set_with_ttl(key, value, self.default_ttl);
    }

    pub fn set_with_ttl(&self, key: impl Into<String>, value: T, ttl: Duration) {
        self.entries().insert(key.into(), CacheEntry::new(value, ttl));
    }

    /// Returns the cached value when valid, otherwise runs `factory` and
    /// stores its result. Concurrent callers missing on the same key wait
    /// for the first one and then read what it stored. A factory error is
    /// returned as-is and nothing is cached.
    pub async fn get_or_set<F, Fut, E>(&self, key: &str, factory: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let lock = self.key_lock(key);
        let _guard = lock.lock().await;

        if let Some(value) = self.get(key) {
            return Ok(value);
        }

        let value = factory().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    pub fn remove(&self, key: &str) -> Option<T> {
        self.entries().remove(key).map(|entry| entry.data)
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    fn key_lock(&self, key: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        in_flight.entry(key.to_string()).or_default().clone()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<T>>> {
        // A panic while holding the lock cannot leave an entry half-written.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
