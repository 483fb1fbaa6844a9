//! One JSON document on disk.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::StorageError;

/// Path to a pretty-printed JSON document; parent directories are created on write.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deserializes the file. A missing file is `NotFound`, bad JSON is `Parse`.
    pub async fn read<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(self.path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&raw)?)
    }

    /// Like [`read`](Self::read) but any failure logs a warning and yields `fallback()`.
    pub async fn read_or_else<T, F>(&self, fallback: F) -> T
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.read().await {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load document, using defaults");
                fallback()
            }
        }
    }

    /// Serializes `value` and replaces the file.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let raw = serde_json::to_string_pretty(value)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// Writes `value` only when no file exists yet. Returns true when it wrote.
    pub async fn write_if_missing<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<bool, StorageError> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.write(value).await?;
        info!(path = %self.path.display(), "Created default document");
        Ok(true)
    }
}
