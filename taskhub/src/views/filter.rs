//! Status filter and title search for the task list page.

use taskhub_model::task::Task;

/// Narrows a snapshot by status and title, both case-insensitive
/// substring matches. An empty needle matches everything, so the default
/// "All" filter and a cleared search box pass every task through.
#[must_use]
pub fn filter_tasks(tasks: &[Task], status_filter: &str, title_search: &str) -> Vec<Task> {
    let status_needle = status_filter.to_lowercase();
    let title_needle = title_search.to_lowercase();
    tasks
        .iter()
        .filter(|task| {
            task.status.as_str().to_lowercase().contains(&status_needle)
                && task.title.to_lowercase().contains(&title_needle)
        })
        .cloned()
        .collect()
}
