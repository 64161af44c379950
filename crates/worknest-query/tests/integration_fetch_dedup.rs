//! Integration tests for in-flight de-duplication in the query cache
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use worknest_query::{QueryClient, QueryConfig, QueryError, QueryKey};

async fn slow_fetch(calls: Arc<AtomicUsize>, value: u32) -> Result<u32, String> {
    calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(value)
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_fetches_share_one_remote_call() {
    let client = Arc::new(QueryClient::new());
    let calls = Arc::new(AtomicUsize::new(0));
    let key = QueryKey::from(["listings"]).with("design");

    let mut handles = Vec::new();
    for n in 0..8 {
        let client = Arc::clone(&client);
        let calls = Arc::clone(&calls);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            client.fetch(&key, move || slow_fetch(calls, n)).await
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.expect("Failed to join fetch task").expect("Failed to fetch"));
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(results.iter().all(|v| *v == results[0]));

    let stats = client.stats().await;
    assert_eq!(stats.fetches, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 7);
}

#[tokio::test(start_paused = true)]
async fn test_distinct_keys_fetch_independently() {
    let client = Arc::new(QueryClient::new());
    let calls = Arc::new(AtomicUsize::new(0));

    let a = {
        let client = Arc::clone(&client);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            client
                .fetch(&QueryKey::from(["tasks", "ws-1"]), move || slow_fetch(calls, 1))
                .await
        })
    };
    let b = {
        let client = Arc::clone(&client);
        let calls = Arc::clone(&calls);
        tokio::spawn(async move {
            client
                .fetch(&QueryKey::from(["tasks", "ws-2"]), move || slow_fetch(calls, 2))
                .await
        })
    };

    assert_eq!(a.await.expect("Failed to join"), Ok(1));
    assert_eq!(b.await.expect("Failed to join"), Ok(2));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_waiters_retry_after_failed_fetch() {
    let client = Arc::new(QueryClient::with_config(QueryConfig {
        stale_time: Duration::from_secs(60),
    }));
    let key = QueryKey::from(["expenses", "ws-1"]);

    let first: Result<u32, QueryError> = client
        .fetch(&key, || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<u32, _>("timeout")
        })
        .await;
    assert_eq!(first, Err(QueryError::Remote("timeout".to_string())));

    let second: u32 = tokio_test::assert_ok!(
        client
            .fetch(&key, || async { Ok::<_, String>(42) })
            .await
    );
    assert_eq!(second, 42);
}
