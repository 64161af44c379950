//! The query cache

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

use crate::error::{QueryError, Result};
use crate::key::QueryKey;
use crate::metrics::{QueryMetrics, QueryStats};

/// Query cache configuration
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// How long fetched data is served without refetching
    pub stale_time: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    data: Value,
    updated_at: Instant,
    invalidated: bool,
}

/// Cache of query results keyed by `QueryKey`.
///
/// Data is stored as JSON so one cache holds every result type; typed access goes through
/// serde. Share it behind an `Arc`.
pub struct QueryClient {
    config: QueryConfig,
    entries: RwLock<HashMap<QueryKey, Entry>>,
    /// One lock per key with a fetch in progress
    in_flight: Mutex<HashMap<QueryKey, Arc<Mutex<()>>>>,
    metrics: QueryMetrics,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::with_config(QueryConfig::default())
    }

    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
            metrics: QueryMetrics::new(),
        }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Return fresh cached data for `key`, or run `fetcher` and cache its result.
    ///
    /// Concurrent calls for the same key wait for the first one and reuse its result, so
    /// the fetcher runs once. A failed fetch caches nothing.
    pub async fn fetch<T, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        if let Some(data) = self.fresh(key).await? {
            self.metrics.record_hit();
            return Ok(data);
        }

        let lock = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(key.clone()).or_default().clone()
        };

        let result = {
            let _guard = lock.lock().await;
            self.fetch_locked(key, fetcher).await
        };

        let mut in_flight = self.in_flight.lock().await;
        // Only the map and this call still hold the lock
        if Arc::strong_count(&lock) <= 2 {
            in_flight.remove(key);
        }

        result
    }

    async fn fetch_locked<T, E, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
    {
        // A concurrent fetch may have filled the entry while we waited
        if let Some(data) = self.fresh(key).await? {
            self.metrics.record_hit();
            tracing::trace!(key = %key, "Query served by concurrent fetch");
            return Ok(data);
        }

        self.metrics.record_miss();
        self.metrics.record_fetch();
        tracing::debug!(key = %key, "Fetching query");

        let data = fetcher().await.map_err(|e| {
            tracing::warn!(key = %key, error = %e, "Query fetch failed");
            QueryError::Remote(e.to_string())
        })?;
        self.set_data(key, &data).await?;
        Ok(data)
    }

    async fn fresh<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry)
                if !entry.invalidated && entry.updated_at.elapsed() < self.config.stale_time =>
            {
                decode(key, entry.data.clone()).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Cached data regardless of freshness
    pub async fn get_data<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) => decode(key, entry.data.clone()).map(Some),
            None => Ok(None),
        }
    }

    /// Write data directly; the entry becomes fresh
    pub async fn set_data<T: Serialize>(&self, key: &QueryKey, data: &T) -> Result<()> {
        let data = encode(key, data)?;
        self.entries.write().await.insert(
            key.clone(),
            Entry {
                data,
                updated_at: Instant::now(),
                invalidated: false,
            },
        );
        Ok(())
    }

    /// Edit cached data in place. Returns `false` when nothing is cached for `key`.
    pub async fn update_data<T, F>(&self, key: &QueryKey, f: F) -> Result<bool>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.write().await;
        let Some(entry) = entries.get_mut(key) else {
            return Ok(false);
        };
        let mut data: T = decode(key, entry.data.clone())?;
        f(&mut data);
        entry.data = encode(key, &data)?;
        Ok(true)
    }

    /// Raw cached value, used to take rollback snapshots
    pub async fn snapshot(&self, key: &QueryKey) -> Option<Value> {
        self.entries.read().await.get(key).map(|e| e.data.clone())
    }

    /// Put a snapshot back; `None` removes the entry
    pub async fn restore(&self, key: &QueryKey, snapshot: Option<Value>) {
        let mut entries = self.entries.write().await;
        match snapshot {
            Some(data) => {
                let entry = entries.entry(key.clone()).or_insert_with(|| Entry {
                    data: Value::Null,
                    updated_at: Instant::now(),
                    invalidated: false,
                });
                entry.data = data;
            }
            None => {
                entries.remove(key);
            }
        }
    }

    /// Mark every entry under `prefix` stale; returns how many were marked
    pub async fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let mut count = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                count += 1;
            }
        }
        drop(entries);

        self.metrics.record_invalidations(count as u64);
        tracing::debug!(prefix = %prefix, count, "Queries invalidated");
        count
    }

    /// Drop every entry under `prefix`; returns how many were dropped
    pub async fn remove(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// True when nothing fresh is cached for `key`
    pub async fn is_stale(&self, key: &QueryKey) -> bool {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) => {
                entry.invalidated || entry.updated_at.elapsed() >= self.config.stale_time
            }
            None => true,
        }
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn stats(&self) -> QueryStats {
        let entry_count = self.entries.read().await.len();
        self.metrics.snapshot(entry_count)
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

fn encode<T: Serialize>(key: &QueryKey, data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| QueryError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: DeserializeOwned>(key: &QueryKey, data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| QueryError::Deserialization {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key() -> QueryKey {
        QueryKey::from(["tasks", "ws-1"])
    }

    #[tokio::test]
    async fn test_fetch_caches_until_invalidated() {
        let client = QueryClient::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = Arc::clone(&calls);
            let value: Vec<String> = client
                .fetch(&key(), move || async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec!["a".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(value, vec!["a".to_string()]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert_eq!(client.invalidate(&QueryKey::from(["tasks"])).await, 1);
        assert!(client.is_stale(&key()).await);

        let counter = Arc::clone(&calls);
        let _: Vec<String> = client
            .fetch(&key(), move || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(vec![])
            })
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let stats = client.stats().await;
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.invalidations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_go_stale_after_stale_time() {
        let client = QueryClient::with_config(QueryConfig {
            stale_time: Duration::from_secs(5),
        });
        client.set_data(&key(), &1u32).await.unwrap();

        tokio::time::advance(Duration::from_secs(4)).await;
        assert!(!client.is_stale(&key()).await);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(client.is_stale(&key()).await);
        assert_eq!(client.get_data::<u32>(&key()).await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_nothing() {
        let client = QueryClient::new();

        let result: Result<u32> = client
            .fetch(&key(), || async { Err::<u32, _>("boom") })
            .await;

        assert_eq!(result, Err(QueryError::Remote("boom".to_string())));
        assert_eq!(client.get_data::<u32>(&key()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_data_and_shape_mismatch() {
        let client = QueryClient::new();
        client.set_data(&key(), &vec![1, 2, 3]).await.unwrap();

        let updated = client
            .update_data::<Vec<i32>, _>(&key(), |v| v.retain(|n| *n != 2))
            .await
            .unwrap();
        assert!(updated);
        assert_eq!(
            client.get_data::<Vec<i32>>(&key()).await.unwrap(),
            Some(vec![1, 3])
        );

        let missing = QueryKey::from(["nothing"]);
        assert!(!client
            .update_data::<Vec<i32>, _>(&missing, |v| v.clear())
            .await
            .unwrap());

        assert!(matches!(
            client.get_data::<String>(&key()).await,
            Err(QueryError::Deserialization { .. })
        ));
    }

    #[tokio::test]
    async fn test_remove_by_prefix() {
        let client = QueryClient::new();
        client.set_data(&key(), &1).await.unwrap();
        client
            .set_data(&QueryKey::from(["tasks", "ws-2"]), &2)
            .await
            .unwrap();
        client
            .set_data(&QueryKey::from(["expenses", "ws-1"]), &3)
            .await
            .unwrap();

        assert_eq!(client.remove(&QueryKey::from(["tasks"])).await, 2);
        assert_eq!(client.stats().await.entry_count, 1);
    }
}
