use crate::error::Result;
use async_trait::async_trait;

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

/// Named-slot key-value store holding serialized board snapshots
///
/// A write replaces the whole slot; there are no partial writes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads a slot, `None` when it was never written
    async fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites a slot with `value`
    async fn write_slot(&self, key: &str, value: &str) -> Result<()>;

    /// Removes a slot; removing an absent slot is not an error
    async fn remove_slot(&self, key: &str) -> Result<()>;

    /// Checks if a slot exists
    async fn has_slot(&self, key: &str) -> bool;
}
