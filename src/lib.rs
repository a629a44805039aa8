//! # Taskboard Core
//!
//! State core for a single-user kanban task board.
//!
//! The [`BoardStore`] owns the board, applies task mutations as whole-board
//! snapshot replacements, projects the board through the active filter and
//! writes every new snapshot to a named key-value slot. Rendering and input
//! handling live outside this crate and talk to the store only through its
//! methods.

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use domain::{
    board::{Board, BoardIssue, Column},
    filter::BoardFilter,
    task::{NewTask, Task, TaskCode, TaskId, TaskPatch, TaskPriority, TaskStatus},
};
pub use error::{BoardError, Result};
pub use persistence::BoardPersistence;
pub use storage::Storage;
pub use store::BoardStore;
