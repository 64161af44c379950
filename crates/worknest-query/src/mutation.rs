//! Observable mutation state

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::client::QueryClient;
use crate::error::{QueryError, Result};
use crate::key::QueryKey;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum MutationState {
    Idle,
    Pending,
    Success,
    Error(String),
}

impl MutationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationState::Pending)
    }
}

/// A remote write whose progress UIs can watch.
///
/// When a run succeeds every configured key prefix is invalidated.
pub struct Mutation {
    client: Arc<QueryClient>,
    invalidates: Vec<QueryKey>,
    state: watch::Sender<MutationState>,
}

impl Mutation {
    pub fn new(client: Arc<QueryClient>) -> Self {
        let (state, _) = watch::channel(MutationState::Idle);
        Self {
            client,
            invalidates: Vec::new(),
            state,
        }
    }

    /// Invalidate `prefix` after each successful run
    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    pub fn reset(&self) {
        self.state.send_replace(MutationState::Idle);
    }

    pub async fn run<R, E, Fut>(&self, remote: Fut) -> Result<R>
    where
        E: fmt::Display,
        Fut: Future<Output = std::result::Result<R, E>>,
    {
        self.state.send_replace(MutationState::Pending);

        match remote.await {
            Ok(value) => {
                for prefix in &self.invalidates {
                    self.client.invalidate(prefix).await;
                }
                self.state.send_replace(MutationState::Success);
                Ok(value)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.send_replace(MutationState::Error(message.clone()));
                Err(QueryError::Remote(message))
            }
        }
    }
}
