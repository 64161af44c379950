//! # Worknest Query
//!
//! Client-side data layer for Worknest front ends.
//!
//! ## Features
//!
//! - **Query cache**: results keyed by `QueryKey`, stale after a configurable time,
//!   invalidated by key prefix, with concurrent fetches of one key de-duplicated
//! - **Mutations**: observable `Idle → Pending → Success | Error` state that invalidates
//!   dependent queries when it settles
//! - **Optimistic mutations**: apply a change to a cached collection before the remote
//!   call, roll it back when the call fails
//! - **Debounced values**: publish only the latest input after a quiet period
//! - **Notifications**: the toasts raised by mutations, behind a `Notifier` trait

pub mod client;
pub mod debounce;
pub mod error;
pub mod key;
pub mod metrics;
pub mod mutation;
pub mod notify;
pub mod optimistic;

pub use client::{QueryClient, QueryConfig};
pub use debounce::Debouncer;
pub use error::{QueryError, Result};
pub use key::QueryKey;
pub use metrics::{QueryMetrics, QueryStats};
pub use mutation::{Mutation, MutationState};
pub use notify::{MemoryNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use optimistic::{LocalChange, MutationOutcome, OptimisticMutation};
