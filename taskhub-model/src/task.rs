//! The task entity and its identifier and status types.
//!
//! Tasks serialize to camelCase JSON (`dueDate`, `isRecurring`,
//! `createdAt`, `updatedAt`), which is the shape the HTTP API exchanges
//! with clients and the shape the store persists.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest permitted task priority.
pub const MIN_PRIORITY: u8 = 1;

/// Highest permitted task priority.
pub const MAX_PRIORITY: u8 = 5;

/// Priority assigned when a create request does not name one.
pub const DEFAULT_PRIORITY: u8 = 2;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Identity of the authenticated caller that owns a set of tasks.
///
/// Opaque to this system: whatever identifier the token issuer placed in
/// the credential's `id` claim. Every store and push-channel operation is
/// scoped by this value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wraps a raw owner identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of a task.
///
/// `Pending` and `Todo` are distinct stored values with overlapping
/// meaning, inherited from the original schema. Storage and the API keep
/// all four values apart; only the reporting summary merges the two into
/// one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not yet started.
    #[default]
    #[serde(rename = "pending")]
    Pending,
    /// Actively being worked on.
    #[serde(rename = "in progress")]
    InProgress,
    /// Not yet started (legacy spelling, kept distinct in storage).
    #[serde(rename = "ToDo")]
    Todo,
    /// Finished.
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    /// All status values, in schema order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Todo, Self::Completed];

    /// The exact string stored and exchanged for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Todo => "ToDo",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known task status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A single owner-scoped unit of work, the sole persisted entity.
///
/// `id`, `owner`, and `created_at` are fixed at creation; `updated_at` is
/// bumped by every successful mutation. All other fields change only
/// through a validated update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque identifier assigned at creation.
    pub id: TaskId,
    /// The authenticated caller the task belongs to. Never changes.
    pub owner: OwnerId,
    /// Short human-readable label. Never empty.
    pub title: String,
    /// Optional free-form detail text.
    pub description: Option<String>,
    /// Current lifecycle status.
    pub status: TaskStatus,
    /// When the task is due, if scheduled.
    pub due_date: Option<DateTime<Utc>>,
    /// Importance from [`MIN_PRIORITY`] to [`MAX_PRIORITY`].
    pub priority: u8,
    /// Ordered labels. Duplicates are discouraged but not enforced here.
    pub tags: Vec<String>,
    /// Whether the task repeats.
    pub is_recurring: bool,
    /// When the task was created. Never changes.
    pub created_at: DateTime<Utc>,
    /// When the task last changed.
    pub updated_at: DateTime<Utc>,
}
