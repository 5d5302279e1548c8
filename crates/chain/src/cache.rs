//! Request-deduplicating cache for async fetches.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use netfee_core::FeeError;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FeeError>>>;

/// Cached fetch, resolved or in flight.
struct CacheEntry<V> {
    future: SharedFetch<V>,
    created_at: Instant,
}

impl<V: Clone> CacheEntry<V> {
    fn new(future: SharedFetch<V>) -> Self {
        Self {
            future,
            created_at: Instant::now(),
        }
    }

    fn is_resolved(&self) -> bool {
        self.future.peek().is_some()
    }

    /// In-flight entries never expire.
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        match ttl {
            Some(ttl) => self.is_resolved() && self.created_at.elapsed() >= ttl,
            None => false,
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self.future.peek(), Some(Err(_)))
    }
}

/// Cache keyed by request identity.
///
/// Concurrent requests for the same key share one in-flight fetch. Resolved
/// values are served until their TTL elapses or they are evicted. Failures
/// are never cached.
pub struct RequestCache<K, V> {
    name: &'static str,
    entries: DashMap<K, CacheEntry<V>>,
    ttl: Option<Duration>,
}

impl<K, V> std::fmt::Debug for RequestCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCache")
            .field("name", &self.name)
            .field("size", &self.entries.len())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<K, V> RequestCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache. `None` keeps entries until evicted.
    pub fn new(name: &'static str, ttl: Option<Duration>) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Get the cached value for `key`, or run `fetch` once for all concurrent callers.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V, FeeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FeeError>> + Send + 'static,
    {
        let shared = match self.entries.entry(key.clone()) {
            Entry::Occupied(occupied) if !occupied.get().is_expired(self.ttl) => {
                debug!(cache = self.name, key = ?key, "Cache hit");
                occupied.get().future.clone()
            }
            Entry::Occupied(mut occupied) => {
                debug!(cache = self.name, key = ?key, "Cache entry expired, refetching");
                let future = fetch().boxed().shared();
                occupied.insert(CacheEntry::new(future.clone()));
                future
            }
            Entry::Vacant(vacant) => {
                debug!(cache = self.name, key = ?key, "Cache miss");
                let future = fetch().boxed().shared();
                vacant.insert(CacheEntry::new(future.clone()));
                future
            }
        };

        let result = shared.await;
        if result.is_err() {
            debug!(cache = self.name, key = ?key, "Fetch failed, evicting");
            self.entries.remove_if(&key, |_, entry| entry.is_failed());
        }
        result
    }

    /// Resolved value for `key`, if cached and not expired.
    pub fn peek(&self, key: &K) -> Option<Result<V, FeeError>> {
        let entry = self.entries.get(key)?;
        if entry.is_expired(self.ttl) {
            return None;
        }
        entry.future.peek().cloned()
    }

    /// Check if a fetch for `key` is in flight.
    pub fn is_pending(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map_or(false, |entry| !entry.is_resolved())
    }

    /// Drop the entry for `key`.
    pub fn evict(&self, key: &K) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(cache = self.name, key = ?key, "Evicted cache entry");
        }
        removed
    }

    /// Keep only entries whose key matches `keep`.
    pub fn retain(&self, mut keep: impl FnMut(&K) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    /// Remove expired entries (call periodically).
    pub fn cleanup(&self) {
        self.entries.retain(|_, entry| !entry.is_expired(self.ttl));
    }

    /// Remove all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including in-flight fetches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: u64,
    ) -> impl FnOnce() -> BoxFuture<'static, Result<u64, FeeError>> {
        let calls = Arc::clone(calls);
        move || {
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                Ok(value)
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_fetch() {
        let cache = Arc::new(RequestCache::<u64, u64>::new("test", None));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let fetch = counting_fetch(&calls, 42);
            handles.push(tokio::spawn(async move { cache.get_or_fetch(1, fetch).await }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Served from cache afterwards
        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 7)).await.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek(&1), Some(Ok(42)));
    }

    #[tokio::test]
    async fn test_distinct_keys_fetch_separately() {
        let cache = RequestCache::<u64, u64>::new("test", None);
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 1)).await.unwrap(), 1);
        assert_eq!(cache.get_or_fetch(2, counting_fetch(&calls, 2)).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let cache = RequestCache::<u64, u64>::new("test", None);
        let calls = Arc::new(AtomicUsize::new(0));

        let failing = {
            let calls = Arc::clone(&calls);
            move || {
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err::<u64, _>(FeeError::MissingGas)
                }
                .boxed()
            }
        };

        assert_eq!(cache.get_or_fetch(1, failing).await, Err(FeeError::MissingGas));
        assert!(cache.is_empty());

        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 5)).await.unwrap(), 5);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry() {
        let cache = RequestCache::<u64, u64>::new("test", Some(Duration::from_secs(5)));
        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 1)).await.unwrap(), 1);
        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 2)).await.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(cache.peek(&1), None);
        assert_eq!(cache.get_or_fetch(1, counting_fetch(&calls, 2)).await.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        tokio::time::advance(Duration::from_secs(10)).await;
        cache.cleanup();
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_pending_and_evict() {
        let cache = Arc::new(RequestCache::<u64, u64>::new("test", None));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let waiting = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(1, move || async move {
                        let _ = rx.await;
                        Ok(9)
                    })
                    .await
            })
        };

        // Let the spawned fetch register
        while !cache.is_pending(&1) {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.peek(&1), None);

        tx.send(()).unwrap();
        assert_eq!(waiting.await.unwrap().unwrap(), 9);
        assert!(!cache.is_pending(&1));

        assert!(cache.evict(&1));
        assert!(!cache.evict(&1));
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_retain() {
        let cache = RequestCache::<(u64, u64), u64>::new("test", None);
        let calls = Arc::new(AtomicUsize::new(0));
        for key in [(1, 1), (1, 2), (2, 1)] {
            cache.get_or_fetch(key, counting_fetch(&calls, 0)).await.unwrap();
        }

        cache.retain(|(chain, _)| *chain != 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.peek(&(2, 1)), Some(Ok(0)));
    }
}
