use crate::domain::task::Task;

/// Sorts tasks in-place into display order: most recently touched first
///
/// A task's recency is its `updated_at`, falling back to `created_at`. The
/// sort is stable, so tasks touched at the same instant keep their order.
///
/// # Examples
/// ```
/// use taskboard_core::domain::sorting::sort_by_recency;
/// use taskboard_core::domain::task::{NewTask, Task, TaskPatch};
///
/// let older = Task::new(NewTask::new("older"));
/// let newer = Task::new(NewTask::new("newer"));
/// std::thread::sleep(std::time::Duration::from_millis(5));
/// let touched = older.patched(&TaskPatch::new().title("touched"));
///
/// let mut tasks = vec![newer, touched];
/// sort_by_recency(&mut tasks);
/// assert_eq!(tasks[0].title, "touched");
/// ```
pub fn sort_by_recency(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| b.last_touched().cmp(&a.last_touched()));
}
