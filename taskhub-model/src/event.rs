//! Push events describing task collection changes.
//!
//! The server broadcasts one event per successful mutation to the owner's
//! live subscribers; clients fold them into their task cache without a
//! full refetch. Events travel as JSON text frames on the WebSocket feed,
//! encoded and decoded here.

use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskId};

/// A change to an owner's task collection, delivered outside the
/// request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TaskEvent {
    /// A task was created.
    TaskAdded {
        /// The created task.
        task: Task,
    },
    /// A task's fields changed.
    TaskUpdated {
        /// The task after the change.
        task: Task,
    },
    /// A task was permanently removed.
    TaskDeleted {
        /// Identifier of the removed task.
        id: TaskId,
    },
}

impl TaskEvent {
    /// The identifier of the task this event concerns.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        match self {
            Self::TaskAdded { task } | Self::TaskUpdated { task } => &task.id,
            Self::TaskDeleted { id } => id,
        }
    }
}

/// Error type for event encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum EventCodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Encodes a [`TaskEvent`] into its JSON wire form.
///
/// # Errors
///
/// Returns `EventCodecError::Serialization` if the event cannot be
/// serialized.
pub fn encode(event: &TaskEvent) -> Result<String, EventCodecError> {
    serde_json::to_string(event).map_err(|e| EventCodecError::Serialization(e.to_string()))
}

/// Decodes a [`TaskEvent`] from its JSON wire form.
///
/// # Errors
///
/// Returns `EventCodecError::Serialization` if the text is not a valid
/// event.
pub fn decode(text: &str) -> Result<TaskEvent, EventCodecError> {
    serde_json::from_str(text).map_err(|e| EventCodecError::Serialization(e.to_string()))
}
