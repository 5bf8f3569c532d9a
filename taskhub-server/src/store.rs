//! Owner-scoped task storage.
//!
//! [`TaskStore`] is the gateway every API handler goes through. All
//! operations take the caller's [`OwnerId`]; for mutations the ownership
//! check is part of the same lookup that finds the task, so a caller can
//! never distinguish "no such task" from "not your task".
//!
//! Implementations:
//! - [`MemoryStore`] -- in-memory collection, the default backend.
//! - [`crate::persist::JsonFileStore`] -- snapshots the collection to a
//!   JSON file after each mutation.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use taskhub_model::fields::{TaskFields, TaskPatch, ValidationError};
use taskhub_model::task::{OwnerId, Task, TaskId};

/// Errors surfaced by task store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// One or more fields violate the task schema. No write happened.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No task with that id exists for this owner. Returned both when the
    /// id is unknown and when it belongs to another owner.
    #[error("task not found")]
    NotFound,

    /// The backing storage failed.
    #[error("storage unavailable: {0}")]
    Storage(String),
}

/// Gateway to the persistent task collection.
///
/// Every operation is implicitly scoped to one owner's tasks. Individual
/// operations are atomic; there are no cross-operation transactions.
pub trait TaskStore: Send + Sync {
    /// Returns every task owned by the caller, oldest first.
    fn list(
        &self,
        owner: &OwnerId,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, StoreError>> + Send;

    /// Validates the fields, assigns an identifier and timestamps, and
    /// persists a new task for the caller.
    fn create(
        &self,
        owner: &OwnerId,
        fields: &TaskFields,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Applies a patch to the caller's task with the given id. The write
    /// is all-or-nothing: a validation failure leaves the task untouched.
    fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> impl std::future::Future<Output = Result<Task, StoreError>> + Send;

    /// Permanently removes the caller's task with the given id.
    fn delete(
        &self,
        owner: &OwnerId,
        id: &TaskId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Returns up to `limit` of the caller's most recently created tasks,
    /// newest first.
    fn recent(
        &self,
        owner: &OwnerId,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, StoreError>> + Send;
}

/// In-memory task store: per-owner maps behind one lock.
pub struct MemoryStore {
    tasks: RwLock<HashMap<OwnerId, HashMap<TaskId, Task>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Rebuilds a store from previously dumped tasks, bucketing them by
    /// their recorded owner.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut map: HashMap<OwnerId, HashMap<TaskId, Task>> = HashMap::new();
        for task in tasks {
            map.entry(task.owner.clone())
                .or_default()
                .insert(task.id, task);
        }
        Self {
            tasks: RwLock::new(map),
        }
    }

    /// Returns every task of every owner, for snapshotting.
    pub async fn dump(&self) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .values()
            .flat_map(|owned| owned.values().cloned())
            .collect()
    }
}

impl TaskStore for MemoryStore {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Task>, StoreError> {
        let tasks = self.tasks.read().await;
        let mut owned: Vec<Task> = tasks
            .get(owner)
            .map(|map| map.values().cloned().collect())
            .unwrap_or_default();
        owned.sort_by_key(|task| (task.created_at, task.id));
        Ok(owned)
    }

    async fn create(&self, owner: &OwnerId, fields: &TaskFields) -> Result<Task, StoreError> {
        let valid = fields.validate()?;
        let task = valid.into_task(owner.clone(), Utc::now());
        let mut tasks = self.tasks.write().await;
        tasks
            .entry(owner.clone())
            .or_default()
            .insert(task.id, task.clone());
        drop(tasks);
        Ok(task)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError> {
        let mut tasks = self.tasks.write().await;
        let owned = tasks.get_mut(owner).ok_or(StoreError::NotFound)?;
        let current = owned.get(id).ok_or(StoreError::NotFound)?;
        let updated = patch.apply_to(current, Utc::now())?;
        owned.insert(*id, updated.clone());
        drop(tasks);
        Ok(updated)
    }

    async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().await;
        let owned = tasks.get_mut(owner).ok_or(StoreError::NotFound)?;
        owned.remove(id).ok_or(StoreError::NotFound)?;
        drop(tasks);
        Ok(())
    }

    async fn recent(&self, owner: &OwnerId, limit: usize) -> Result<Vec<Task>, StoreError> {
        let mut owned = self.list(owner).await?;
        owned.reverse();
        owned.truncate(limit);
        Ok(owned)
    }
}
