//! The client's in-memory copy of the owner's task list.
//!
//! Canonical state lives in the server's store; this cache is a
//! disposable, eventually-consistent copy fed by an initial full fetch
//! and incremental push events. Merges are keyed by task identifier and
//! resolved last-writer-wins on `updated_at`, so duplicated, reordered,
//! or raced deliveries all converge to the same state and an identifier
//! can never appear twice.

use std::collections::HashMap;

use parking_lot::RwLock;

use taskhub_model::event::TaskEvent;
use taskhub_model::task::{Task, TaskId};

/// Working copy of the authenticated caller's tasks.
#[derive(Default)]
pub struct TaskCache {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl TaskCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole cache with a freshly fetched list.
    pub fn replace_all(&self, tasks: Vec<Task>) {
        let mut map = self.tasks.write();
        map.clear();
        for task in tasks {
            map.insert(task.id, task);
        }
    }

    /// Folds one push event into the cache.
    ///
    /// Idempotent and commutative for the event kinds the server emits:
    /// replaying an event is a no-op, an update for an unknown id is
    /// inserted, and a delete for an unknown id does nothing.
    pub fn apply(&self, event: &TaskEvent) {
        match event {
            TaskEvent::TaskAdded { task } | TaskEvent::TaskUpdated { task } => {
                self.upsert(task.clone());
            }
            TaskEvent::TaskDeleted { id } => {
                self.remove(id);
            }
        }
    }

    /// Merges a single task, keeping whichever copy changed last.
    ///
    /// Local HTTP responses and push events go through the same merge, so
    /// a stale response arriving after a newer push is simply ignored. On
    /// an `updated_at` tie the incoming copy wins, which keeps replays
    /// idempotent.
    pub fn upsert(&self, task: Task) {
        let mut map = self.tasks.write();
        match map.get(&task.id) {
            Some(existing) if existing.updated_at > task.updated_at => {
                // Stale copy; keep what we have.
            }
            _ => {
                map.insert(task.id, task);
            }
        }
    }

    /// Drops a task from the cache; unknown ids are a no-op. Returns
    /// whether anything was removed.
    pub fn remove(&self, id: &TaskId) -> bool {
        self.tasks.write().remove(id).is_some()
    }

    /// Returns a copy of one task, if cached.
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.read().get(id).cloned()
    }

    /// Snapshot of every cached task, oldest first. This is the input
    /// the derived views consume.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Task> {
        let map = self.tasks.read();
        let mut tasks: Vec<Task> = map.values().cloned().collect();
        drop(map);
        tasks.sort_by_key(|task| (task.created_at, task.id));
        tasks
    }

    /// Number of cached tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    /// Whether the cache holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }
}
