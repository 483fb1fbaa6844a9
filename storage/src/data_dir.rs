//! The data directory holding every persisted document.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config_repo::ConfigRepository;
use crate::error::StorageError;
use crate::profile_repo::ProfileRepository;

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    config: ConfigRepository,
    profiles: ProfileRepository,
}

impl DataDir {
    /// Creates the directory and any missing default documents.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        info!(path = %root.display(), "Opening data directory");
        tokio::fs::create_dir_all(&root).await?;

        let data_dir = Self {
            config: ConfigRepository::new(&root),
            profiles: ProfileRepository::new(&root),
            root,
        };
        data_dir.config.ensure_default().await?;
        data_dir.profiles.ensure_default().await?;
        Ok(data_dir)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ConfigRepository {
        &self.config
    }

    pub fn profiles(&self) -> &ProfileRepository {
        &self.profiles
    }
}
