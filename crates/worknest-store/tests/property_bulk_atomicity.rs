//! Property tests for bulk writes
//!
//! `update_many` and `delete_many` change every selected task or none of them.
use std::collections::HashSet;

use proptest::prelude::*;
use worknest_domain::{ListQuery, Task, TaskDraft, TaskPatch, Workspace, WorkspaceDraft};
use worknest_store::{Database, StoreError};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime")
}

/// A workspace holding `count` tasks, plus the ids picked by `mask`
async fn seeded(count: usize, mask: &[bool]) -> (Database, String, Vec<String>) {
    let db = Database::new();
    let ws = db
        .create::<Workspace>(WorkspaceDraft {
            name: "Bulk".to_string(),
            description: String::new(),
            owner_id: "owner-1".to_string(),
        })
        .await
        .expect("Failed to create workspace");

    let mut selected = Vec::new();
    for (n, pick) in (0..count).zip(mask.iter().chain(std::iter::repeat(&false))) {
        let task = db
            .create::<Task>(TaskDraft::new(ws.id.clone(), format!("task {n}")))
            .await
            .expect("Failed to create task");
        if *pick {
            selected.push(task.id);
        }
    }
    (db, ws.id, selected)
}

async fn tasks(db: &Database, workspace_id: &str) -> Vec<Task> {
    let mut query = ListQuery::for_workspace(workspace_id);
    query.limit = Some(1000);
    let mut items = db.list::<Task>(&query).await.items;
    items.sort_by(|a, b| a.id.cmp(&b.id));
    items
}

fn renamed() -> TaskPatch {
    TaskPatch {
        title: Some("renamed".to_string()),
        ..Default::default()
    }
}

proptest! {
    #[test]
    fn prop_update_many_is_all_or_nothing(
        count in 1usize..10,
        mask in prop::collection::vec(any::<bool>(), 10),
        unknown_at in prop::option::of(0usize..10),
    ) {
        runtime().block_on(async {
            let (db, ws_id, mut selected) = seeded(count, &mask).await;
            if let Some(at) = unknown_at {
                selected.insert(at.min(selected.len()), "no-such-task".to_string());
            }
            let before = tasks(&db, &ws_id).await;

            let result = db.update_many::<Task>(&selected, renamed()).await;
            let after = tasks(&db, &ws_id).await;

            if unknown_at.is_some() {
                let is_not_found = matches!(result, Err(StoreError::NotFound { .. }));
                prop_assert!(is_not_found);
                prop_assert_eq!(after, before);
            } else {
                let picked: HashSet<&String> = selected.iter().collect();
                prop_assert_eq!(result.map(|updated| updated.len()).ok(), Some(picked.len()));
                for task in &after {
                    prop_assert_eq!(task.title == "renamed", picked.contains(&task.id));
                }
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_delete_many_is_all_or_nothing(
        count in 1usize..10,
        mask in prop::collection::vec(any::<bool>(), 10),
        unknown_at in prop::option::of(0usize..10),
    ) {
        runtime().block_on(async {
            let (db, ws_id, mut selected) = seeded(count, &mask).await;
            if let Some(at) = unknown_at {
                selected.insert(at.min(selected.len()), "no-such-task".to_string());
            }
            let before = tasks(&db, &ws_id).await;

            let result = db.delete_many::<Task>(&selected).await;
            let after = tasks(&db, &ws_id).await;

            if unknown_at.is_some() {
                let is_not_found = matches!(result, Err(StoreError::NotFound { .. }));
                prop_assert!(is_not_found);
                prop_assert_eq!(after, before);
            } else {
                prop_assert_eq!(after.len(), count - selected.len());
                prop_assert!(after.iter().all(|task| !selected.contains(&task.id)));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}
