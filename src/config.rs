use crate::{
    domain::Board,
    error::{BoardError, Result},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Store configuration, read from TOML
///
/// Every field has a default, so an empty file or a missing one yields
/// [`StoreConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of the slot holding the board snapshot
    pub storage_key: String,
    /// Title given to a freshly created default board
    pub board_title: String,
    /// Root directory for file-backed slots
    pub data_dir: PathBuf,
}

impl StoreConfig {
    pub const DEFAULT_STORAGE_KEY: &'static str = "kanban-board-storage";
    const DEFAULT_DATA_DIR: &'static str = ".taskboard";

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| BoardError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the config file at `path`, or defaults if it does not exist
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).await?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(BoardError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: Self::DEFAULT_STORAGE_KEY.to_string(),
            board_title: Board::DEFAULT_TITLE.to_string(),
            data_dir: PathBuf::from(Self::DEFAULT_DATA_DIR),
        }
    }
}
