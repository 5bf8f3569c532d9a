//! Dashboard summary counts.

use taskhub_model::task::{Task, TaskStatus};

/// Counts of tasks by reporting bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// All tasks, regardless of status.
    pub total: usize,
    /// Tasks with status `completed`.
    pub completed: usize,
    /// Tasks with status `in progress`.
    pub in_progress: usize,
    /// Tasks with status `pending` or `ToDo`, merged into one bucket.
    ///
    /// The store keeps the two statuses distinct; the merge is a
    /// reporting normalization only.
    pub pending: usize,
}

/// Tallies a task snapshot into the dashboard summary.
#[must_use]
pub fn summary(tasks: &[Task]) -> Summary {
    let mut out = Summary {
        total: tasks.len(),
        ..Summary::default()
    };
    for task in tasks {
        match task.status {
            TaskStatus::Completed => out.completed += 1,
            TaskStatus::InProgress => out.in_progress += 1,
            TaskStatus::Pending | TaskStatus::Todo => out.pending += 1,
        }
    }
    out
}
