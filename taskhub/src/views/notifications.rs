//! Due-today and due-tomorrow reminders.

use chrono::{DateTime, TimeZone, Utc};

use taskhub_model::task::{Task, TaskId};

/// Whether a deadline lands on the viewer's current or next calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueWhen {
    /// The due date falls on the viewer's current day.
    Today,
    /// The due date falls on the viewer's next day.
    Tomorrow,
}

/// A deadline reminder derived from one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The task the reminder refers to.
    pub task_id: TaskId,
    /// Title of that task, for display.
    pub title: String,
    /// Which day bucket the deadline falls in.
    pub due: DueWhen,
    /// The task's due timestamp.
    pub due_date: DateTime<Utc>,
}

/// Emits one reminder per task due on the viewer's current or next
/// calendar day, soonest first.
///
/// Days are compared in the time zone of `now`, so the caller decides
/// what "today" means; given the same snapshot and instant the result
/// is identical. Tasks without a due date never notify.
#[must_use]
pub fn notifications<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<Notification> {
    let today = now.date_naive();
    let Some(tomorrow) = today.succ_opt() else {
        return Vec::new();
    };

    let mut out: Vec<Notification> = tasks
        .iter()
        .filter_map(|task| {
            let due_date = task.due_date?;
            let due_day = due_date.with_timezone(&now.timezone()).date_naive();
            let due = if due_day == today {
                DueWhen::Today
            } else if due_day == tomorrow {
                DueWhen::Tomorrow
            } else {
                return None;
            };
            Some(Notification {
                task_id: task.id,
                title: task.title.clone(),
                due,
                due_date,
            })
        })
        .collect();
    out.sort_by_key(|notification| notification.due_date);
    out
}
