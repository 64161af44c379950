//! Property tests for optimistic mutations
//!
//! A failed remote call must leave the cached collection exactly as it was before the
//! mutation; a successful one must leave exactly the untouched items.
use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use worknest_domain::{Page, Record, Task, TaskDraft, TaskStatus};
use worknest_query::{
    LocalChange, MemoryNotifier, MutationOutcome, OptimisticMutation, QueryClient, QueryKey,
};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

fn tasks(count: usize) -> Page<Task> {
    let items: Vec<Task> = (0..count)
        .map(|n| Task::from_draft(TaskDraft::new("ws-1", format!("task {n}"))).expect("valid draft"))
        .collect();
    Page {
        total: items.len(),
        limit: 50,
        offset: 0,
        items,
    }
}

async fn run_delete(
    initial: &Page<Task>,
    selected: &HashSet<String>,
    remote_ok: bool,
) -> (MutationOutcome<()>, Page<Task>) {
    let client = Arc::new(QueryClient::new());
    let key = QueryKey::from(["tasks", "ws-1"]);
    client.set_data(&key, initial).await.expect("Failed to seed cache");

    let mutation: OptimisticMutation<Task> = OptimisticMutation::new(
        Arc::clone(&client),
        key.clone(),
        Arc::new(MemoryNotifier::new()),
        "Delete tasks",
    );
    let outcome = mutation
        .perform(selected, LocalChange::Remove, async move {
            if remote_ok {
                Ok(())
            } else {
                Err("server error".to_string())
            }
        })
        .await;

    let cached = client
        .get_data::<Page<Task>>(&key)
        .await
        .expect("Failed to read cache")
        .expect("cache entry present");
    (outcome, cached)
}

proptest! {
    #[test]
    fn prop_failed_delete_restores_collection(count in 1usize..12, mask in prop::collection::vec(any::<bool>(), 12)) {
        let initial = tasks(count);
        let selected: HashSet<String> = initial
            .items
            .iter()
            .zip(&mask)
            .filter(|(_, pick)| **pick)
            .map(|(t, _)| t.id().to_string())
            .collect();

        let (outcome, cached) = runtime().block_on(run_delete(&initial, &selected, false));

        prop_assert_eq!(outcome, MutationOutcome::RolledBack("server error".to_string()));
        prop_assert_eq!(cached, initial);
    }

    #[test]
    fn prop_committed_delete_keeps_only_unselected(count in 1usize..12, mask in prop::collection::vec(any::<bool>(), 12)) {
        let initial = tasks(count);
        let selected: HashSet<String> = initial
            .items
            .iter()
            .zip(&mask)
            .filter(|(_, pick)| **pick)
            .map(|(t, _)| t.id().to_string())
            .collect();

        let (outcome, cached) = runtime().block_on(run_delete(&initial, &selected, true));

        prop_assert!(outcome.is_committed());
        prop_assert_eq!(cached.items.len(), count - selected.len());
        prop_assert_eq!(cached.total, count - selected.len());
        prop_assert!(cached.items.iter().all(|t| !selected.contains(&t.id)));
        prop_assert!(cached.items.iter().all(|t| t.status == TaskStatus::Todo));
    }
}
