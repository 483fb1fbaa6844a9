use async_trait::async_trait;

use crate::error::StorageError;

/// A whole JSON document persisted as one unit; loads never fail, saves replace the file.
#[async_trait]
pub trait Repository<T> {
    /// Reads the document, falling back to defaults when the file is missing or malformed.
    async fn load(&self) -> T;
    async fn save(&self, document: &T) -> Result<(), StorageError>;
}
