pub mod board;
pub mod filter;
pub mod sorting;
pub mod task;

pub use board::{Board, BoardIssue, Column};
pub use filter::BoardFilter;
pub use sorting::sort_by_recency;
pub use task::{NewTask, Task, TaskCode, TaskId, TaskPatch, TaskPriority, TaskStatus};
