//! JSON-file-backed task store.
//!
//! Keeps the whole collection in memory (delegating to
//! [`MemoryStore`]) and rewrites a single JSON snapshot file after every
//! successful mutation. A failed snapshot write is logged and does not
//! fail the request; the next mutation rewrites the full state, so one
//! missed snapshot is recovered automatically.

use std::path::PathBuf;

use taskhub_model::fields::{TaskFields, TaskPatch};
use taskhub_model::task::{OwnerId, Task, TaskId};

use crate::store::{MemoryStore, StoreError, TaskStore};

/// Task store persisted as one JSON document on disk.
pub struct JsonFileStore {
    memory: MemoryStore,
    path: PathBuf,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading any existing snapshot.
    ///
    /// A missing file starts an empty collection; an unreadable or
    /// unparsable file is an error rather than silent data loss.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the file exists but cannot be
    /// read or parsed.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let memory = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let tasks: Vec<Task> = serde_json::from_slice(&bytes).map_err(|e| {
                    StoreError::Storage(format!("corrupt store file {}: {e}", path.display()))
                })?;
                tracing::info!(path = %path.display(), count = tasks.len(), "loaded task snapshot");
                MemoryStore::from_tasks(tasks)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => {
                return Err(StoreError::Storage(format!(
                    "cannot read store file {}: {e}",
                    path.display()
                )));
            }
        };
        Ok(Self { memory, path })
    }

    /// Rewrites the snapshot file from the current in-memory state.
    async fn snapshot(&self) {
        let tasks = self.memory.dump().await;
        let json = match serde_json::to_vec_pretty(&tasks) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize task snapshot");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&self.path, json).await {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to write task snapshot; will retry on next mutation"
            );
        }
    }
}

impl TaskStore for JsonFileStore {
    async fn list(&self, owner: &OwnerId) -> Result<Vec<Task>, StoreError> {
        self.memory.list(owner).await
    }

    async fn create(&self, owner: &OwnerId, fields: &TaskFields) -> Result<Task, StoreError> {
        let task = self.memory.create(owner, fields).await?;
        self.snapshot().await;
        Ok(task)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: &TaskId,
        patch: &TaskPatch,
    ) -> Result<Task, StoreError> {
        let task = self.memory.update(owner, id, patch).await?;
        self.snapshot().await;
        Ok(task)
    }

    async fn delete(&self, owner: &OwnerId, id: &TaskId) -> Result<(), StoreError> {
        self.memory.delete(owner, id).await?;
        self.snapshot().await;
        Ok(())
    }

    async fn recent(&self, owner: &OwnerId, limit: usize) -> Result<Vec<Task>, StoreError> {
        self.memory.recent(owner, limit).await
    }
}
