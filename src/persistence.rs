//! Snapshot adapter between the board and a [`Storage`] slot.
//!
//! The slot holds `{ "board": Board }` as JSON. Filter state is never
//! written. Loading validates the shape before decoding and falls back to
//! `None` on any mismatch, leaving the caller to start from a default board.

use crate::{
    domain::Board,
    error::{BoardError, Result},
    storage::Storage,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
struct PersistedStateRef<'a> {
    board: &'a Board,
}

#[derive(Deserialize)]
struct PersistedState {
    board: Board,
}

/// Serializes a board into the persisted slot layout
pub fn encode_snapshot(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(&PersistedStateRef { board })?)
}

/// Decodes the persisted slot layout, rejecting structurally invalid data
pub fn decode_snapshot(text: &str) -> Result<Board> {
    let value: Value = serde_json::from_str(text)?;

    let board = value
        .get("board")
        .ok_or_else(|| BoardError::StorageError("snapshot has no board".to_string()))?;
    if !board.get("columns").is_some_and(Value::is_array) {
        return Err(BoardError::StorageError(
            "board.columns is not a list".to_string(),
        ));
    }

    let state: PersistedState = serde_json::from_value(value)?;
    Ok(state.board)
}

/// Loads and saves board snapshots in one named slot
pub struct BoardPersistence<S> {
    storage: S,
    key: String,
}

impl<S: Storage> BoardPersistence<S> {
    pub fn new(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the slot; `None` when it is absent or unusable
    pub async fn load(&self) -> Option<Board> {
        let text = match self.storage.read_slot(&self.key).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::debug!(key = %self.key, "no persisted board");
                return None;
            }
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "failed to read persisted board");
                return None;
            }
        };

        match decode_snapshot(&text) {
            Ok(board) => Some(board),
            Err(error) => {
                tracing::warn!(key = %self.key, %error, "discarding invalid persisted board");
                None
            }
        }
    }

    /// Overwrites the slot with a full snapshot of `board`
    pub async fn save(&self, board: &Board) -> Result<()> {
        let json = encode_snapshot(board)?;
        self.storage.write_slot(&self.key, &json).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.remove_slot(&self.key).await
    }
}
