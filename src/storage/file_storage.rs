use crate::{
    config::StoreConfig,
    error::{BoardError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based slot storage: one `<key>.json` file per slot
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    const SLOT_EXTENSION: &'static str = "json";

    /// Creates a new FileStorage rooted at the given directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root_path: root.as_ref().to_path_buf(),
        }
    }

    /// Creates a FileStorage rooted at the configured `data_dir`
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(&config.data_dir)
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    fn slot_file(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(BoardError::StorageError(format!(
                "Invalid slot key: {:?}",
                key
            )));
        }
        Ok(self
            .root_path
            .join(format!("{}.{}", key, Self::SLOT_EXTENSION)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.slot_file(key)?;

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        Ok(Some(contents))
    }

    async fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.slot_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        fs::write(file_path, value).await?;
        Ok(())
    }

    async fn remove_slot(&self, key: &str) -> Result<()> {
        let file_path = self.slot_file(key)?;

        if file_path.exists() {
            fs::remove_file(file_path).await?;
        }
        Ok(())
    }

    async fn has_slot(&self, key: &str) -> bool {
        self.slot_file(key).map(|p| p.exists()).unwrap_or(false)
    }
}
