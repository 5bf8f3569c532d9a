//! Structured create and update requests with field-level validation.
//!
//! [`TaskFields`] is the create request; [`TaskPatch`] is the update
//! request with every mutable field optional. Both reject unknown JSON
//! keys at deserialization, so a misspelled field fails the request
//! instead of being dropped silently. Validation collects every field
//! violation before failing, which lets the API report all problems in
//! one response.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{
    DEFAULT_PRIORITY, MAX_PRIORITY, MIN_PRIORITY, OwnerId, Task, TaskId, TaskStatus,
};

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// JSON name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the constraint that failed.
    pub message: String,
}

/// Rejected write: one or more fields violate the task schema.
///
/// Carries every violation found, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The individual field violations, in schema order.
    pub violations: Vec<FieldViolation>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Fields for creating a task.
///
/// `title` is required (a missing key deserializes to an empty string and
/// fails validation); everything else falls back to the schema defaults.
/// `status` and `priority` arrive loosely typed and are checked during
/// [`validate`](Self::validate) so that a bad value produces a field
/// violation rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TaskFields {
    /// Task title. Required, non-empty after trimming.
    pub title: String,
    /// Optional detail text.
    pub description: Option<String>,
    /// Status as its schema string; defaults to `pending` when absent.
    pub status: Option<String>,
    /// Optional due timestamp.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority 1-5; defaults to 2 when absent.
    pub priority: Option<i64>,
    /// Ordered tag labels.
    pub tags: Vec<String>,
    /// Whether the task repeats. Defaults to false.
    pub is_recurring: bool,
}

impl TaskFields {
    /// Checks every field against the task schema, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] carrying one [`FieldViolation`] per
    /// failed field: empty title, unknown status, or priority outside
    /// 1-5.
    pub fn validate(&self) -> Result<ValidFields, ValidationError> {
        let mut violations = Vec::new();

        if self.title.trim().is_empty() {
            violations.push(FieldViolation {
                field: "title",
                message: "title is required".to_string(),
            });
        }

        let status = match self.status.as_deref() {
            None => TaskStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                violations.push(status_violation(raw));
                TaskStatus::default()
            }),
        };

        let priority = match self.priority {
            None => DEFAULT_PRIORITY,
            Some(value) => check_priority(value).unwrap_or_else(|violation| {
                violations.push(violation);
                DEFAULT_PRIORITY
            }),
        };

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        Ok(ValidFields {
            title: self.title.clone(),
            description: self.description.clone(),
            status,
            due_date: self.due_date,
            priority,
            tags: self.tags.clone(),
            is_recurring: self.is_recurring,
        })
    }
}

impl From<&Task> for TaskFields {
    /// Re-opens an existing task as an editable field set (used when a
    /// form is initialized from a task being edited).
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: Some(task.status.to_string()),
            due_date: task.due_date,
            priority: Some(i64::from(task.priority)),
            tags: task.tags.clone(),
            is_recurring: task.is_recurring,
        }
    }
}

/// A create request that has passed validation, with defaults applied
/// and loose fields resolved to their typed forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    /// Non-empty task title.
    pub title: String,
    /// Optional detail text.
    pub description: Option<String>,
    /// Resolved status.
    pub status: TaskStatus,
    /// Optional due timestamp.
    pub due_date: Option<DateTime<Utc>>,
    /// Priority within 1-5.
    pub priority: u8,
    /// Ordered tag labels.
    pub tags: Vec<String>,
    /// Whether the task repeats.
    pub is_recurring: bool,
}

impl ValidFields {
    /// Builds the persisted task: assigns a fresh identifier, fixes the
    /// owner, and stamps both timestamps with `now`.
    #[must_use]
    pub fn into_task(self, owner: OwnerId, now: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::new(),
            owner,
            title: self.title,
            description: self.description,
            status: self.status,
            due_date: self.due_date,
            priority: self.priority,
            tags: self.tags,
            is_recurring: self.is_recurring,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update for a task: absent (or JSON `null`) fields keep their
/// stored value. Identifier, owner, and timestamps are not patchable by
/// construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TaskPatch {
    /// New title, if changing. Must remain non-empty.
    pub title: Option<String>,
    /// New detail text, if changing.
    pub description: Option<String>,
    /// New status as its schema string, if changing.
    pub status: Option<String>,
    /// New due timestamp, if changing.
    pub due_date: Option<DateTime<Utc>>,
    /// New priority 1-5, if changing.
    pub priority: Option<i64>,
    /// Replacement tag list, if changing.
    pub tags: Option<Vec<String>>,
    /// New recurring flag, if changing.
    pub is_recurring: Option<bool>,
}

impl TaskPatch {
    /// Produces the task as it would look after this patch, bumping
    /// `updated_at` to `now`.
    ///
    /// The input task is untouched; callers swap in the result only on
    /// success, which makes the write all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] with every field violation found; no
    /// part of the patch is applied in that case.
    pub fn apply_to(&self, task: &Task, now: DateTime<Utc>) -> Result<Task, ValidationError> {
        let mut violations = Vec::new();
        let mut updated = task.clone();

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                violations.push(FieldViolation {
                    field: "title",
                    message: "title must not be empty".to_string(),
                });
            } else {
                updated.title = title.clone();
            }
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        if let Some(raw) = &self.status {
            match raw.parse() {
                Ok(status) => updated.status = status,
                Err(_) => violations.push(status_violation(raw)),
            }
        }
        if let Some(due_date) = self.due_date {
            updated.due_date = Some(due_date);
        }
        if let Some(value) = self.priority {
            match check_priority(value) {
                Ok(priority) => updated.priority = priority,
                Err(violation) => violations.push(violation),
            }
        }
        if let Some(tags) = &self.tags {
            updated.tags = tags.clone();
        }
        if let Some(is_recurring) = self.is_recurring {
            updated.is_recurring = is_recurring;
        }

        if !violations.is_empty() {
            return Err(ValidationError { violations });
        }

        updated.updated_at = now;
        Ok(updated)
    }
}

fn status_violation(raw: &str) -> FieldViolation {
    FieldViolation {
        field: "status",
        message: format!(
            "{raw:?} is not a valid status (expected one of: pending, in progress, ToDo, completed)"
        ),
    }
}

fn check_priority(value: i64) -> Result<u8, FieldViolation> {
    u8::try_from(value)
        .ok()
        .filter(|p| (MIN_PRIORITY..=MAX_PRIORITY).contains(p))
        .ok_or_else(|| FieldViolation {
            field: "priority",
            message: format!(
                "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {value}"
            ),
        })
}
