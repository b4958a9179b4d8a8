use async_trait::async_trait;

use crate::error::StoreError;

/// Read access to the key/value store holding registration records.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Returns every key starting with `prefix`.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;

    /// Returns the raw value under `key`, or `None` if it vanished since enumeration.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}
