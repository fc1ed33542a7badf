//! Time-bounded cache with single-flight population.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use super::clock::{Clock, SystemClock};

struct Entry<V> {
    value: V,
    expires_at: Instant,
}

/// Async cache where each entry lives for a fixed TTL.
///
/// Readers of a fresh entry never block each other. On a miss, callers queue
/// on one fill lock and re-check after acquiring it, so concurrent misses run
/// the fetch exactly once and share its result. Failed fetches leave no entry
/// behind.
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<K, Entry<V>>>,
    fill: Mutex<()>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
            fill: Mutex::new(()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key` if it has not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone())
    }

    /// Returns the fresh value for `key`, running `fetch` to fill it on a miss.
    pub async fn get_or_populate<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key).await {
            return Ok(value);
        }

        let _fill = self.fill.lock().await;
        if let Some(value) = self.get(&key).await {
            tracing::trace!("cache filled while waiting");
            return Ok(value);
        }

        let value = fetch().await?;
        let expires_at = self.clock.now() + self.ttl;
        self.entries.write().await.insert(
            key,
            Entry {
                value: value.clone(),
                expires_at,
            },
        );

        Ok(value)
    }

    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache(clock: &Arc<ManualClock>) -> TtlCache<&'static str, u32> {
        TtlCache::with_clock(Duration::from_secs(60), Arc::clone(clock) as Arc<dyn Clock>)
    }

    async fn counted(calls: &AtomicUsize, value: u32) -> Result<u32, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(value)
    }

    #[tokio::test]
    async fn fresh_entry_skips_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = AtomicUsize::new(0);

        let first = cache.get_or_populate("k", || counted(&calls, 1)).await;
        let second = cache.get_or_populate("k", || counted(&calls, 2)).await;

        assert_eq!(first, Ok(1));
        assert_eq!(second, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_refetched() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = AtomicUsize::new(0);

        cache
            .get_or_populate("k", || counted(&calls, 1))
            .await
            .unwrap();
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&"k").await, Some(1));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"k").await, None);
        let refreshed = cache.get_or_populate("k", || counted(&calls, 2)).await;

        assert_eq!(refreshed, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);

        let failed = cache
            .get_or_populate("k", || async { Err::<u32, _>("storage down".to_string()) })
            .await;
        assert_eq!(failed, Err("storage down".to_string()));
        assert_eq!(cache.get(&"k").await, None);

        let recovered = cache
            .get_or_populate("k", || async { Ok::<_, String>(7) })
            .await;
        assert_eq!(recovered, Ok(7));
    }

    #[tokio::test]
    async fn concurrent_misses_share_one_fetch() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(cache(&clock));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    cache
                        .get_or_populate("k", || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(20)).await;
                            Ok::<_, String>(42)
                        })
                        .await
                })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap(), Ok(42));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_refresh() {
        let clock = Arc::new(ManualClock::new());
        let cache = cache(&clock);
        let calls = AtomicUsize::new(0);

        cache
            .get_or_populate("k", || counted(&calls, 1))
            .await
            .unwrap();
        cache.invalidate(&"k").await;
        let value = cache.get_or_populate("k", || counted(&calls, 2)).await;

        assert_eq!(value, Ok(2));
        cache.clear().await;
        assert_eq!(cache.get(&"k").await, None);
    }
}
