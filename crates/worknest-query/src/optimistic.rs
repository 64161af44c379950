//! Optimistic updates over a cached collection

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{watch, Mutex};
use worknest_domain::{Page, Record};

use crate::client::QueryClient;
use crate::key::QueryKey;
use crate::mutation::MutationState;
use crate::notify::{Notification, Notifier};

/// The local effect of a mutation on matching items
pub enum LocalChange<T> {
    /// Matching items leave the collection
    Remove,
    /// Applied to each matching item
    Update(Box<dyn Fn(&mut T) + Send + Sync>),
}

impl<T> LocalChange<T> {
    pub fn update(f: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        LocalChange::Update(Box::new(f))
    }
}

impl<T> fmt::Debug for LocalChange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalChange::Remove => f.write_str("Remove"),
            LocalChange::Update(_) => f.write_str("Update(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome<R> {
    /// The remote call succeeded
    Committed(R),
    /// The remote call failed and the cache was restored
    RolledBack(String),
}

impl<R> MutationOutcome<R> {
    pub fn is_committed(&self) -> bool {
        matches!(self, MutationOutcome::Committed(_))
    }

    pub fn into_result(self) -> Result<R, String> {
        match self {
            MutationOutcome::Committed(value) => Ok(value),
            MutationOutcome::RolledBack(message) => Err(message),
        }
    }
}

/// Applies a change to the cached `Page<T>` under one key before the remote call
/// confirms it.
///
/// Only one rollback snapshot is kept. Overlapping `perform` calls overwrite it, so a
/// failure restores whatever the most recent call captured.
pub struct OptimisticMutation<T: Record> {
    client: Arc<QueryClient>,
    key: QueryKey,
    notifier: Arc<dyn Notifier>,
    title: String,
    success_message: Option<String>,
    snapshot: Mutex<Option<Option<Value>>>,
    state: watch::Sender<MutationState>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> OptimisticMutation<T> {
    pub fn new(
        client: Arc<QueryClient>,
        key: QueryKey,
        notifier: Arc<dyn Notifier>,
        title: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(MutationState::Idle);
        Self {
            client,
            key,
            notifier,
            title: title.into(),
            success_message: None,
            snapshot: Mutex::new(None),
            state,
            _record: PhantomData,
        }
    }

    /// Raise a success toast with `message` when a call commits
    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    /// Apply `change` to every cached item whose id is in `ids`, then await `remote`.
    ///
    /// On failure the cache is restored from the snapshot and an error notification is
    /// raised. Either way the key is invalidated once the call settles.
    pub async fn perform<R, E, Fut>(
        &self,
        ids: &HashSet<String>,
        change: LocalChange<T>,
        remote: Fut,
    ) -> MutationOutcome<R>
    where
        E: fmt::Display,
        Fut: Future<Output = Result<R, E>>,
    {
        self.state.send_replace(MutationState::Pending);

        let previous = self.client.snapshot(&self.key).await;
        *self.snapshot.lock().await = Some(previous);

        if let Err(e) = self.apply_locally(ids, &change).await {
            tracing::warn!(key = %self.key, error = %e, "Optimistic update skipped");
        }

        let outcome = match remote.await {
            Ok(value) => {
                self.snapshot.lock().await.take();
                self.state.send_replace(MutationState::Success);
                if let Some(message) = &self.success_message {
                    self.notifier
                        .notify(Notification::success(self.title.clone(), message.clone()));
                }
                MutationOutcome::Committed(value)
            }
            Err(e) => {
                let message = e.to_string();
                if let Some(snapshot) = self.snapshot.lock().await.take() {
                    self.client.restore(&self.key, snapshot).await;
                }
                tracing::warn!(
                    key = %self.key,
                    items = ids.len(),
                    error = %message,
                    "Remote mutation failed, cache rolled back"
                );
                self.notifier
                    .notify(Notification::error(self.title.clone(), message.clone()));
                self.state.send_replace(MutationState::Error(message.clone()));
                MutationOutcome::RolledBack(message)
            }
        };

        self.client.invalidate(&self.key).await;
        outcome
    }

    async fn apply_locally(
        &self,
        ids: &HashSet<String>,
        change: &LocalChange<T>,
    ) -> crate::error::Result<bool> {
        self.client
            .update_data::<Page<T>, _>(&self.key, |page| match change {
                LocalChange::Remove => {
                    let before = page.items.len();
                    page.items.retain(|item| !ids.contains(item.id()));
                    page.total = page.total.saturating_sub(before - page.items.len());
                }
                LocalChange::Update(f) => {
                    for item in page.items.iter_mut().filter(|item| ids.contains(item.id())) {
                        f(item);
                    }
                }
            })
            .await
    }
}
