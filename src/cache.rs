use dashmap::DashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;

struct StoredEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory key/value store where every entry expires a fixed time after insertion.
///
/// Concurrent misses for the same key may both run their fetch; the later
/// insert wins. Values are idempotent reads, so that race only costs a
/// duplicate request.
pub struct TtlCache<K, V> {
    entries: DashMap<K, StoredEntry<V>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Stores a value that expires after the cache TTL.
    ///
    /// Expired entries are dropped first, so keys that are never read again
    /// do not pile up.
    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value))]
    pub fn put(&self, key: K, value: V) {
        let purged = self.purge_expired();
        if purged > 0 {
            tracing::debug!("Purged {} expired entries", purged);
        }
        let expires_at = Instant::now() + self.ttl;
        self.entries.insert(key, StoredEntry { value, expires_at });
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self))]
    pub fn get(&self, key: &K) -> Option<V> {
        let fresh = match self.entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => Some(entry.value.clone()),
            Some(_) => None,
            None => {
                tracing::debug!("Key not found");
                return None;
            }
        };

        if fresh.is_some() {
            tracing::debug!("Key found and still fresh");
        } else {
            tracing::debug!("Key found but expired");
            self.entries
                .remove_if(key, |_, entry| Instant::now() >= entry.expires_at);
        }
        fresh
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its success.
    ///
    /// Errors are returned as-is and leave the cache untouched.
    pub async fn get_or_try_fetch<E, F, Fut>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(hit) = self.get(&key) {
            return Ok(hit);
        }

        let value = fetch().await?;
        self.put(key, value.clone());
        Ok(value)
    }

    /// Drops every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        before - self.entries.len()
    }

    /// Number of stored entries, including ones that expired but were not yet purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_put_then_get_until_expiry() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_secs(60));
        cache.put("a".to_string(), 1);

        assert_eq!(cache.get(&"a".to_string()), Some(1));

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get(&"a".to_string()), Some(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_or_try_fetch_calls_fetch_once_per_window() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(600));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_try_fetch("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(42)
                })
                .await
                .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(601)).await;
        cache
            .get_or_try_fetch("k", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(43)
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let cache: TtlCache<&'static str, u32> = TtlCache::new(Duration::from_secs(600));

        let err = cache
            .get_or_try_fetch("k", || async { Err::<u32, _>("timeout") })
            .await
            .unwrap_err();
        assert_eq!(err, "timeout");
        assert!(cache.get(&"k").is_none());

        let ok = cache
            .get_or_try_fetch("k", || async { Ok::<_, &str>(7) })
            .await
            .unwrap();
        assert_eq!(ok, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_fresh_entries() {
        let cache: TtlCache<u8, u8> = TtlCache::new(Duration::from_secs(10));
        cache.put(1, 1);
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.put(2, 2);
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&2), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_evicts_unread_expired_keys() {
        let cache: TtlCache<u32, u32> = TtlCache::new(Duration::from_secs(60));
        for key in 0..1000 {
            cache.put(key, key);
        }
        assert_eq!(cache.len(), 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        cache.put(5000, 1);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&5000), Some(1));
        assert_eq!(cache.get(&0), None);
    }
}
