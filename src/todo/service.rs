use super::category_map::{CategoryMap, EditTarget};
use super::change::Change;
use super::completed::{CompletedLog, CompletedRecord};
use super::error::{TodoError, TodoResult};
use super::filter::{FilteredView, filter_view};
use crate::storage::{KeyValueStore, TodoStore};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

/// Owns the live items and the completed log, and keeps them written through
/// to storage.
///
/// Every mutation is staged on a copy, persisted, and only then swapped in.
/// A failed write leaves memory and storage as they were.
pub struct TodoService<S: KeyValueStore> {
    store: TodoStore<S>,
    map: CategoryMap,
    completed: CompletedLog,
}

impl<S: KeyValueStore> TodoService<S> {
    /// Load both structures from `kv`. Unreadable data starts empty.
    pub fn open(kv: S) -> Self {
        let store = TodoStore::new(kv);
        let map = store.load_items();
        let completed = store.load_completed();
        info!(
            categories = map.categories().len(),
            items = map.item_count(),
            completed = completed.len(),
            "todo state loaded"
        );
        Self {
            store,
            map,
            completed,
        }
    }

    pub fn map(&self) -> &CategoryMap {
        &self.map
    }

    pub fn completed(&self) -> &CompletedLog {
        &self.completed
    }

    pub fn store(&self) -> &TodoStore<S> {
        &self.store
    }

    /// Re-read both keys, replacing whatever is in memory.
    pub fn reload(&mut self) {
        self.map = self.store.load_items();
        self.completed = self.store.load_completed();
    }

    /// Pick up writes another process made since the last read. Returns
    /// true when anything differed from memory.
    pub fn sync(&mut self) -> bool {
        let map = self.store.load_items();
        let completed = self.store.load_completed();
        if map == self.map && completed == self.completed {
            return false;
        }
        debug!(items = map.item_count(), completed = completed.len(), "storage changed elsewhere");
        self.map = map;
        self.completed = completed;
        true
    }

    pub fn search(&self, query: &str) -> FilteredView {
        filter_view(&self.map, query)
    }

    pub fn add(&mut self, category: &str, text: &str) -> TodoResult<Vec<Change>> {
        let mut staged = self.map.clone();
        let changes = staged.add(category, text)?;
        self.commit_items(staged)?;
        debug!(category, "add committed");
        Ok(changes)
    }

    pub fn edit(
        &mut self,
        target: &EditTarget,
        text: &str,
        category: &str,
    ) -> TodoResult<Vec<Change>> {
        let mut staged = self.map.clone();
        let changes = staged.edit(target, text, category)?;
        self.commit_items(staged)?;
        debug!(
            from = %target.category,
            position = target.position,
            to = category,
            "edit committed"
        );
        Ok(changes)
    }

    /// Forget an item. Deleted items are not logged anywhere.
    pub fn remove(&mut self, category: &str, position: usize) -> TodoResult<Vec<Change>> {
        let mut staged = self.map.clone();
        let (_, changes) = staged.remove(category, position)?;
        self.commit_items(staged)?;
        debug!(category, position, "remove committed");
        Ok(changes)
    }

    pub fn complete(&mut self, category: &str, position: usize) -> TodoResult<Vec<Change>> {
        self.complete_at(category, position, Utc::now())
    }

    /// Move an item to the completed log with an explicit timestamp.
    pub fn complete_at(
        &mut self,
        category: &str,
        position: usize,
        completed_at: DateTime<Utc>,
    ) -> TodoResult<Vec<Change>> {
        let mut staged = self.map.clone();
        let (text, changes) = staged.remove(category, position)?;

        let mut staged_log = self.completed.clone();
        staged_log.append(CompletedRecord::new(text, category, completed_at));

        self.store.save_completion(&staged, &staged_log)?;
        self.map = staged;
        self.completed = staged_log;
        debug!(category, position, completed = self.completed.len(), "complete committed");
        Ok(changes)
    }

    fn commit_items(&mut self, staged: CategoryMap) -> Result<(), TodoError> {
        self.store.save_items(&staged)?;
        self.map = staged;
        Ok(())
    }
}
