//! The activity logger and its event stores

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::ActivityLogResult;
use crate::events::{ActivityEvent, EventCategory, EventFilter, LogLevel};

/// Where events are kept
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn append(&self, event: ActivityEvent) -> ActivityLogResult<()>;

    /// Matching events, newest first, at most `filter.limit`
    async fn query(&self, filter: &EventFilter) -> ActivityLogResult<Vec<ActivityEvent>>;

    async fn count(&self, filter: &EventFilter) -> ActivityLogResult<u64>;

    /// Remove matching events, returning how many went
    async fn purge(&self, filter: &EventFilter) -> ActivityLogResult<u64>;
}

/// Ring buffer of the most recent `capacity` events
pub struct MemoryEventStore {
    events: RwLock<VecDeque<ActivityEvent>>,
    capacity: usize,
}

impl MemoryEventStore {
    pub const DEFAULT_CAPACITY: usize = 10_000;

    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(&self, event: ActivityEvent) -> ActivityLogResult<()> {
        let mut events = self.events.write().await;
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
        Ok(())
    }

    async fn query(&self, filter: &EventFilter) -> ActivityLogResult<Vec<ActivityEvent>> {
        let events = self.events.read().await;
        let limit = filter.limit.unwrap_or(usize::MAX);
        Ok(events
            .iter()
            .rev()
            .filter(|event| filter.matches(event))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &EventFilter) -> ActivityLogResult<u64> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|event| filter.matches(event)).count() as u64)
    }

    async fn purge(&self, filter: &EventFilter) -> ActivityLogResult<u64> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|event| !filter.matches(event));
        Ok((before - events.len()) as u64)
    }
}

/// Audit trail collaborator handed to API state and client hooks
pub struct ActivityLogger {
    store: Arc<dyn EventStore>,
    min_level: LogLevel,
    mirror: bool,
}

impl ActivityLogger {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryEventStore::default()))
    }

    /// Logger keeping at most `capacity` events in memory
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_store(Arc::new(MemoryEventStore::new(capacity)))
    }

    pub fn with_store(store: Arc<dyn EventStore>) -> Self {
        Self {
            store,
            min_level: LogLevel::Info,
            mirror: true,
        }
    }

    /// Drop events below `level` instead of storing them
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Also emit every stored event through `tracing` (on by default)
    pub fn mirror_to_tracing(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Validate and store an event
    pub async fn log_activity(&self, event: ActivityEvent) -> ActivityLogResult<()> {
        event.validate()?;
        if event.level < self.min_level {
            return Ok(());
        }

        if self.mirror {
            mirror(&event);
        }
        self.store.append(event).await
    }

    /// Like `log_activity`, but a failure only produces a warning.
    ///
    /// A mutation never fails because its audit record could not be written.
    pub async fn record(&self, event: ActivityEvent) {
        if let Err(e) = self.log_activity(event).await {
            warn!(error = %e, "Failed to record activity event");
        }
    }

    pub async fn query_events(&self, filter: &EventFilter) -> ActivityLogResult<Vec<ActivityEvent>> {
        self.store.query(filter).await
    }

    pub async fn count_events(&self, filter: &EventFilter) -> ActivityLogResult<u64> {
        self.store.count(filter).await
    }

    pub async fn purge_events(&self, filter: &EventFilter) -> ActivityLogResult<u64> {
        self.store.purge(filter).await
    }

    pub async fn stats(&self) -> ActivityLogResult<LoggerStats> {
        let events = self.store.query(&EventFilter::everything()).await?;

        let mut stats = LoggerStats {
            total_events: events.len() as u64,
            ..LoggerStats::default()
        };
        for event in &events {
            *stats.by_level.entry(event.level).or_default() += 1;
            *stats.by_category.entry(event.category.clone()).or_default() += 1;
        }
        Ok(stats)
    }
}

impl Default for ActivityLogger {
    fn default() -> Self {
        Self::new()
    }
}

fn mirror(event: &ActivityEvent) {
    let summary = event.summary();
    let category = event.category.label();
    match event.level {
        LogLevel::Debug => debug!(target: "worknest::activity", category, "{}", summary),
        LogLevel::Info => info!(target: "worknest::activity", category, "{}", summary),
        LogLevel::Warning => warn!(target: "worknest::activity", category, "{}", summary),
        LogLevel::Error => error!(target: "worknest::activity", category, "{}", summary),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoggerStats {
    pub total_events: u64,
    pub by_level: BTreeMap<LogLevel, u64>,
    pub by_category: HashMap<EventCategory, u64>,
}
