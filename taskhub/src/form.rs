//! Editable draft of a task being created or updated.
//!
//! The form holds a [`TaskFields`] draft and mutates it through the same
//! controls the task form exposes: text fields, a date picker, a stepped
//! priority control, tag chips, and a recurring toggle. Nothing leaves
//! the form until [`submit`](TaskForm::submit) hands the draft to the
//! caller-supplied handler.

use chrono::{DateTime, Utc};

use taskhub_model::fields::TaskFields;
use taskhub_model::task::{MAX_PRIORITY, MIN_PRIORITY, Task, TaskStatus};

/// Why a draft was refused at submit time. The message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The title box is empty or whitespace-only.
    #[error("Title is required")]
    TitleRequired,
}

/// Mutable draft of a single task.
///
/// A fresh form starts from the schema defaults; editing an existing
/// task pre-populates the draft verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskForm {
    draft: TaskFields,
}

impl TaskForm {
    /// Empty draft with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-populated from an existing task.
    #[must_use]
    pub fn editing(task: &Task) -> Self {
        Self {
            draft: TaskFields::from(task),
        }
    }

    /// Read-only view of the current draft.
    #[must_use]
    pub const fn draft(&self) -> &TaskFields {
        &self.draft
    }

    /// Sets the title text.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    /// Sets the description text.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = Some(description.into());
    }

    /// Picks a status from the select control.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.draft.status = Some(status.to_string());
    }

    /// Sets or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.draft.due_date = due_date;
    }

    /// Sets the priority through the stepped control, clamping to the
    /// 1-5 range.
    pub fn set_priority(&mut self, priority: i64) {
        self.draft.priority =
            Some(priority.clamp(i64::from(MIN_PRIORITY), i64::from(MAX_PRIORITY)));
    }

    /// Appends a tag. Empty values and duplicates are ignored; returns
    /// whether the list changed.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if tag.is_empty() || self.draft.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.draft.tags.push(tag.to_string());
        true
    }

    /// Removes a tag by value; returns whether it was present.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.draft.tags.len();
        self.draft.tags.retain(|existing| existing != tag);
        self.draft.tags.len() != before
    }

    /// Flips the recurring switch, returning the new value.
    pub fn toggle_recurring(&mut self) -> bool {
        self.draft.is_recurring = !self.draft.is_recurring;
        self.draft.is_recurring
    }

    /// Validates the title and hands the full draft to `on_submit`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::TitleRequired`] for an empty or
    /// whitespace-only title; the handler is not called and the draft is
    /// kept so the user can fix it.
    pub fn submit<F: FnOnce(TaskFields)>(&self, on_submit: F) -> Result<(), FormError> {
        if self.draft.title.trim().is_empty() {
            return Err(FormError::TitleRequired);
        }
        on_submit(self.draft.clone());
        Ok(())
    }

    /// Discards the draft and notifies `on_cancel`.
    pub fn cancel<F: FnOnce()>(self, on_cancel: F) {
        drop(self);
        on_cancel();
    }
}
