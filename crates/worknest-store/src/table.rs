//! A single record table

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;
use worknest_domain::{ListQuery, Page, Record};

use crate::error::{Result, StoreError};

/// Records of one type keyed by id
pub struct Table<T: Record> {
    rows: RwLock<HashMap<String, T>>,
}

impl<T: Record> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub async fn insert(&self, record: T) -> Result<T> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(record.id()) {
            return Err(StoreError::Conflict(format!(
                "{} {} already exists",
                T::KIND,
                record.id()
            )));
        }
        rows.insert(record.id().to_string(), record.clone());
        Ok(record)
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.rows.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.rows.read().await.contains_key(id)
    }

    /// Filter, order by `(created_at, id)` and page
    pub async fn list(&self, query: &ListQuery) -> Page<T> {
        let rows = self.rows.read().await;
        let mut matching: Vec<&T> = rows.values().filter(|r| query.matches(*r)).collect();
        matching.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        let limit = query.effective_limit();
        let offset = query.effective_offset();
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Page {
            items,
            total,
            limit,
            offset,
        }
    }

    /// Validate and apply a patch to one record
    pub async fn update(&self, id: &str, patch: T::Patch) -> Result<T> {
        let mut rows = self.rows.write().await;
        let record = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
        record.apply_patch(patch)?;
        Ok(record.clone())
    }

    /// Apply `f` to one record under the write lock
    pub async fn modify<F>(&self, id: &str, f: F) -> Result<T>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let mut rows = self.rows.write().await;
        let record = rows
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))?;
        let mut staged = record.clone();
        f(&mut staged)?;
        *record = staged.clone();
        Ok(staged)
    }

    /// Apply one patch to every id, or to none of them.
    ///
    /// Fails with `NotFound` for the first unknown id before anything changes.
    pub async fn update_many(&self, ids: &[String], patch: T::Patch) -> Result<Vec<T>> {
        let mut rows = self.rows.write().await;

        let mut staged = Vec::with_capacity(ids.len());
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let mut record = rows
                .get(id)
                .cloned()
                .ok_or_else(|| StoreError::not_found(T::KIND, id.as_str()))?;
            record.apply_patch(patch.clone())?;
            staged.push(record);
        }

        for record in &staged {
            rows.insert(record.id().to_string(), record.clone());
        }
        Ok(staged)
    }

    pub async fn remove(&self, id: &str) -> Result<T> {
        self.rows
            .write()
            .await
            .remove(id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    /// Remove every id, or none of them
    pub async fn remove_many(&self, ids: &[String]) -> Result<Vec<T>> {
        let mut rows = self.rows.write().await;

        if let Some(missing) = ids.iter().find(|id| !rows.contains_key(id.as_str())) {
            return Err(StoreError::not_found(T::KIND, missing.as_str()));
        }

        Ok(ids.iter().filter_map(|id| rows.remove(id)).collect())
    }

    /// Remove every record owned by `workspace_id`, returning how many went
    pub async fn remove_workspace(&self, workspace_id: &str) -> usize {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|_, r| r.workspace_id() != workspace_id);
        before - rows.len()
    }

    pub async fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.rows.read().await.values().filter(|r| predicate(*r)).count()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T: Record> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use worknest_domain::{Task, TaskDraft, TaskPatch, TaskStatus};

    async fn seeded(titles: &[&str]) -> (Table<Task>, Vec<String>) {
        let table = Table::new();
        let mut ids = Vec::new();
        for title in titles {
            let task = Task::from_draft(TaskDraft::new("ws-1", *title)).unwrap();
            ids.push(task.id.clone());
            table.insert(task).await.unwrap();
        }
        (table, ids)
    }

    #[tokio::test]
    async fn test_list_orders_by_creation_and_pages() {
        let (table, _) = seeded(&["a", "b", "c"]).await;

        let page = table
            .list(&ListQuery::for_workspace("ws-1").with_limit(2).with_offset(1))
            .await;
        assert_eq!(page.total, 3);
        let titles: Vec<_> = page.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_update_many_is_all_or_nothing() {
        let (table, mut ids) = seeded(&["a", "b"]).await;
        ids.push("missing".to_string());

        let result = table
            .update_many(&ids, TaskPatch::status(TaskStatus::Done))
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));

        for id in &ids[..2] {
            assert_eq!(table.get(id).await.unwrap().status, TaskStatus::Todo);
        }
    }

    #[tokio::test]
    async fn test_update_many_rejects_invalid_patch_without_changes() {
        let (table, ids) = seeded(&["a", "b"]).await;
        let patch = TaskPatch {
            title: Some(" ".to_string()),
            ..Default::default()
        };

        tokio_test::assert_err!(table.update_many(&ids, patch).await);
        assert_eq!(table.get(&ids[0]).await.unwrap().title, "a");
    }

    #[tokio::test]
    async fn test_remove_many_is_all_or_nothing() {
        let (table, mut ids) = seeded(&["a", "b"]).await;
        ids.push("missing".to_string());

        tokio_test::assert_err!(table.remove_many(&ids).await);
        assert_eq!(table.len().await, 2);

        ids.pop();
        let removed = tokio_test::assert_ok!(table.remove_many(&ids).await);
        assert_eq!(removed.len(), 2);
        assert!(table.is_empty().await);
    }

    #[tokio::test]
    async fn test_modify_leaves_record_untouched_on_error() {
        let (table, ids) = seeded(&["a"]).await;

        let result = table
            .modify(&ids[0], |task| {
                task.title = "changed".to_string();
                Err(StoreError::Conflict("nope".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(table.get(&ids[0]).await.unwrap().title, "a");
    }
}
