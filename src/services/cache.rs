use dashmap::DashMap;
use std::future::Future;
use std::time::{Duration, Instant};

/// Short-lived memo of upstream responses, keyed by request.
///
/// A zero TTL disables caching entirely.
pub struct QuoteCache<V> {
    entries: DashMap<String, Entry<V>>,
    ttl: Duration,
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

impl<V: Clone> QuoteCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Fresh value for `key`, dropping it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            return Some(entry.value.clone());
        }
        drop(entry);
        self.entries.remove(key);
        None
    }

    pub fn insert(&self, key: String, value: V) {
        if !self.is_enabled() {
            return;
        }
        self.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Cached value for `key`, or the result of `fetch` stored on success.
    ///
    /// Concurrent misses for the same key may each call `fetch`; the last
    /// one to finish wins.
    pub async fn get_or_try_insert_with<E, F, Fut>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.insert(key.to_string(), value.clone());
        Ok(value)
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.stored_at.elapsed() < ttl);
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
