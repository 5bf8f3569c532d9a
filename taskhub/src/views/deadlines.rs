//! Upcoming-deadline list for the dashboard.

use chrono::{DateTime, Utc};

use taskhub_model::task::Task;

/// How many upcoming deadlines the dashboard shows.
pub const UPCOMING_DEADLINES_LIMIT: usize = 3;

/// Tasks due strictly after `now`, soonest first, truncated to the
/// dashboard limit. Tasks without a due date and tasks already overdue
/// never appear.
#[must_use]
pub fn upcoming_deadlines(tasks: &[Task], now: DateTime<Utc>) -> Vec<Task> {
    let mut upcoming: Vec<Task> = tasks
        .iter()
        .filter(|task| task.due_date.is_some_and(|due| due > now))
        .cloned()
        .collect();
    upcoming.sort_by_key(|task| task.due_date);
    upcoming.truncate(UPCOMING_DEADLINES_LIMIT);
    upcoming
}
