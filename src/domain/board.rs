use crate::{
    domain::{
        sorting::sort_by_recency,
        task::{Task, TaskId, TaskStatus},
    },
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};

/// A fixed partition of the board holding the tasks of one status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            tasks: Vec::new(),
        }
    }

    /// Tasks in display order: most recently touched first
    pub fn sorted_tasks(&self) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        sort_by_recency(&mut tasks);
        tasks
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.tasks.iter().any(|t| &t.id == id)
    }
}

/// A structural problem found by [`Board::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardIssue {
    DuplicateColumn(TaskStatus),
    MisplacedTask {
        task: TaskId,
        column: TaskStatus,
        status: TaskStatus,
    },
    DuplicateTask(TaskId),
}

impl fmt::Display for BoardIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(status) => write!(f, "more than one column for {}", status),
            Self::MisplacedTask {
                task,
                column,
                status,
            } => write!(
                f,
                "task {} has status {} but sits in the {} column",
                task, status, column
            ),
            Self::DuplicateTask(id) => write!(f, "task {} appears more than once", id),
        }
    }
}

/// Kanban board state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    pub title: String,
    pub columns: Vec<Column>,
}

impl Board {
    const DEFAULT_ID: &'static str = "main-board";
    pub const DEFAULT_TITLE: &'static str = "Kanban Board";

    /// Creates the default three-column board with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Self::DEFAULT_ID.to_string(),
            title: title.into(),
            columns: vec![
                Column::new("todo", "To Do", TaskStatus::Todo),
                Column::new("in-progress", "In Progress", TaskStatus::InProgress),
                Column::new("done", "Done", TaskStatus::Done),
            ],
        }
    }

    /// Gets the column for a status
    pub fn column_for_status(&self, status: TaskStatus) -> Option<&Column> {
        self.columns.iter().find(|col| col.status == status)
    }

    pub fn has_column(&self, status: TaskStatus) -> bool {
        self.column_for_status(status).is_some()
    }

    /// All tasks on the board, column by column
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.columns.iter().flat_map(|col| col.tasks.iter())
    }

    pub fn find_task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks().find(|t| &t.id == id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|col| col.tasks.len()).sum()
    }

    /// Returns a new board with `task` appended to the column for its status
    pub fn with_task_added(&self, task: Task) -> Result<Board> {
        self.ensure_column(task.status)?;

        let mut task = Some(task);
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let mut tasks = col.tasks.clone();
                if task.as_ref().is_some_and(|t| t.status == col.status) {
                    tasks.extend(task.take());
                }
                Column {
                    tasks,
                    ..col.clone()
                }
            })
            .collect();

        Ok(self.with_columns(columns))
    }

    /// Returns a new board where `task` replaces the task with the same id
    ///
    /// The task keeps its position when its column is unchanged and is
    /// appended to the destination column otherwise.
    pub fn with_task_replaced(&self, task: Task) -> Result<Board> {
        self.ensure_column(task.status)?;

        let mut task = Some(task);
        let id = task.as_ref().map(|t| t.id);
        let columns = self
            .columns
            .iter()
            .map(|col| {
                let owns = task.as_ref().is_some_and(|t| t.status == col.status);
                let mut tasks: Vec<Task> = Vec::with_capacity(col.tasks.len() + 1);
                for existing in &col.tasks {
                    if Some(existing.id) != id {
                        tasks.push(existing.clone());
                    } else if owns {
                        tasks.extend(task.take());
                    }
                }
                if owns {
                    tasks.extend(task.take());
                }
                Column {
                    tasks,
                    ..col.clone()
                }
            })
            .collect();

        Ok(self.with_columns(columns))
    }

    /// Returns a new board without any task carrying `id`
    pub fn without_task(&self, id: &TaskId) -> Board {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                tasks: col.tasks.iter().filter(|t| &t.id != id).cloned().collect(),
                ..col.clone()
            })
            .collect();

        self.with_columns(columns)
    }

    /// Lists structural problems; an empty list means the board is sound
    pub fn validate(&self) -> Vec<BoardIssue> {
        let mut issues = Vec::new();
        let mut statuses = HashSet::new();
        let mut ids = HashSet::new();

        for col in &self.columns {
            if !statuses.insert(col.status) {
                issues.push(BoardIssue::DuplicateColumn(col.status));
            }
            for task in &col.tasks {
                if task.status != col.status {
                    issues.push(BoardIssue::MisplacedTask {
                        task: task.id,
                        column: col.status,
                        status: task.status,
                    });
                }
                if !ids.insert(task.id) {
                    issues.push(BoardIssue::DuplicateTask(task.id));
                }
            }
        }

        issues
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    fn ensure_column(&self, status: TaskStatus) -> Result<()> {
        if self.has_column(status) {
            Ok(())
        } else {
            Err(BoardError::UnknownColumn { status })
        }
    }

    fn with_columns(&self, columns: Vec<Column>) -> Board {
        Board {
            id: self.id.clone(),
            title: self.title.clone(),
            columns,
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TITLE)
    }
}
