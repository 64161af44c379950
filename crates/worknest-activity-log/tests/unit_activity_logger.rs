//! ActivityLogger behaviour: level threshold, ring capacity, ordering, purge and stats

use std::sync::Arc;

use serde_json::json;
use worknest_activity_log::{
    ActivityEvent, ActivityLogger, EventCategory, EventFilter, EventStore, LogLevel,
    MemoryEventStore,
};

fn task_event(action: &str, workspace_id: &str) -> ActivityEvent {
    ActivityEvent::new(
        LogLevel::Info,
        EventCategory::Task,
        action,
        "member-1",
        format!("task/{action}"),
    )
    .with_workspace_id(workspace_id)
}

#[tokio::test]
async fn test_events_below_min_level_are_dropped() {
    let logger = ActivityLogger::new().with_min_level(LogLevel::Warning);

    logger
        .log_activity(task_event("task_created", "ws-1"))
        .await
        .unwrap();
    let mut rollback = task_event("tasks_deleted", "ws-1");
    rollback.level = LogLevel::Warning;
    logger.log_activity(rollback).await.unwrap();

    let count = logger.count_events(&EventFilter::everything()).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_invalid_event_is_rejected_but_record_swallows_it() {
    let logger = ActivityLogger::new();
    let nameless = ActivityEvent::new(LogLevel::Info, EventCategory::System, "", "member-1", "x");

    assert!(logger.log_activity(nameless.clone()).await.is_err());
    logger.record(nameless).await;

    assert_eq!(logger.count_events(&EventFilter::everything()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_query_returns_newest_first() {
    let logger = ActivityLogger::new().mirror_to_tracing(false);
    for action in ["first", "second", "third"] {
        logger.record(task_event(action, "ws-1")).await;
    }

    let events = logger.query_events(&EventFilter::new()).await.unwrap();
    let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["third", "second", "first"]);

    let limited = logger
        .query_events(&EventFilter::new().with_limit(1))
        .await
        .unwrap();
    assert_eq!(limited[0].action, "third");
}

#[tokio::test]
async fn test_capacity_evicts_oldest() {
    let logger = ActivityLogger::with_capacity(2);
    for action in ["a", "b", "c"] {
        logger.record(task_event(action, "ws-1")).await;
    }

    let events = logger.query_events(&EventFilter::new()).await.unwrap();
    let actions: Vec<&str> = events.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, vec!["c", "b"]);
}

#[tokio::test]
async fn test_shared_store_sees_events_from_every_logger() {
    let store: Arc<dyn EventStore> = Arc::new(MemoryEventStore::new(100));
    let api = ActivityLogger::with_store(Arc::clone(&store));
    let client = ActivityLogger::with_store(Arc::clone(&store));

    api.record(task_event("task_created", "ws-1")).await;
    client
        .record(
            ActivityEvent::new(
                LogLevel::Warning,
                EventCategory::Client,
                "tasks_deleted",
                "member-1",
                "workspace/ws-1",
            )
            .with_workspace_id("ws-1")
            .with_details(json!({ "rolled_back": true })),
        )
        .await;

    let events = store
        .query(&EventFilter::new().with_workspace_id("ws-1"))
        .await
        .unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].details["rolled_back"], true);
}

#[tokio::test]
async fn test_purge_and_stats() {
    let logger = ActivityLogger::new();
    logger.record(task_event("task_created", "ws-1")).await;
    logger.record(task_event("task_updated", "ws-2")).await;
    logger
        .record(ActivityEvent::new(
            LogLevel::Error,
            EventCategory::Client,
            "tasks_updated",
            "member-2",
            "workspace/ws-2",
        ))
        .await;

    let stats = logger.stats().await.unwrap();
    assert_eq!(stats.total_events, 3);
    assert_eq!(stats.by_level[&LogLevel::Error], 1);
    assert_eq!(stats.by_category[&EventCategory::Task], 2);

    let purged = logger
        .purge_events(&EventFilter::everything().with_workspace_id("ws-2"))
        .await
        .unwrap();
    assert_eq!(purged, 1);
    assert_eq!(logger.count_events(&EventFilter::everything()).await.unwrap(), 2);
}
