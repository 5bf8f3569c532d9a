//! Task list rendered as calendar intervals.

use chrono::{DateTime, Duration, Utc};

use taskhub_model::task::{Task, TaskId, TaskStatus};

/// Color bucket for a calendar event, derived from task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventColor {
    /// Success color: the task is completed.
    Completed,
    /// Warning color: the task is in progress.
    InProgress,
    /// Theme default: everything else.
    Default,
}

impl From<TaskStatus> for EventColor {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => Self::Completed,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Pending | TaskStatus::Todo => Self::Default,
        }
    }
}

/// A task as an all-day calendar interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Identifier of the underlying task.
    pub id: TaskId,
    /// Title of that task, for display.
    pub title: String,
    /// Interval start: the task's creation time.
    pub start: DateTime<Utc>,
    /// Interval end: the due date, or start plus one day when undated.
    pub end: DateTime<Utc>,
    /// The task's status, for detail rendering.
    pub status: TaskStatus,
    /// Color bucket derived from the status.
    pub color: EventColor,
}

/// Maps every task to a calendar interval.
#[must_use]
pub fn calendar_events(tasks: &[Task]) -> Vec<CalendarEvent> {
    tasks
        .iter()
        .map(|task| {
            let start = task.created_at;
            let end = task.due_date.unwrap_or_else(|| start + Duration::days(1));
            CalendarEvent {
                id: task.id,
                title: task.title.clone(),
                start,
                end,
                status: task.status,
                color: EventColor::from(task.status),
            }
        })
        .collect()
}
