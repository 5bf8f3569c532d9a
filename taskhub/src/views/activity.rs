//! Recent-activity feed for the dashboard.

use taskhub_model::task::{Task, TaskStatus};

/// How many entries the recent-activity panel shows.
pub const RECENT_ACTIVITY_LIMIT: usize = 5;

/// Display icon bucket for an activity entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityIcon {
    /// Check mark: the task is completed.
    Completed,
    /// Pencil: the task is in progress.
    InProgress,
    /// Plus sign: everything else.
    Other,
}

impl From<TaskStatus> for ActivityIcon {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Completed => Self::Completed,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Pending | TaskStatus::Todo => Self::Other,
        }
    }
}

/// One row of the recent-activity panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// The task that changed.
    pub task: Task,
    /// Icon bucket derived from the task's status.
    pub icon: ActivityIcon,
}

/// The most recently modified tasks, newest first, truncated to the
/// panel limit.
#[must_use]
pub fn recent_activity(tasks: &[Task]) -> Vec<ActivityEntry> {
    let mut sorted: Vec<Task> = tasks.to_vec();
    sorted.sort_by_key(|task| std::cmp::Reverse((task.updated_at, task.id)));
    sorted.truncate(RECENT_ACTIVITY_LIMIT);
    sorted
        .into_iter()
        .map(|task| {
            let icon = ActivityIcon::from(task.status);
            ActivityEntry { task, icon }
        })
        .collect()
}
