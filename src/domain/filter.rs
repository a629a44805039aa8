use crate::domain::{
    board::{Board, Column},
    task::{Task, TaskPriority, TaskStatus},
};

/// Transient status/priority filter over a board. Never persisted.
///
/// Both conditions are AND-ed; an unset condition matches every task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoardFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl BoardFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.priority.is_some()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }

    /// Projects `board` onto the matching tasks, keeping every column
    pub fn apply(&self, board: &Board) -> Board {
        Board {
            id: board.id.clone(),
            title: board.title.clone(),
            columns: board
                .columns
                .iter()
                .map(|col| Column {
                    tasks: col.tasks.iter().filter(|t| self.matches(t)).cloned().collect(),
                    ..col.clone()
                })
                .collect(),
        }
    }
}
