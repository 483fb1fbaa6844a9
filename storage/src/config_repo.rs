//! Configuration repository: `config.json`.

use std::path::Path;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::error::StorageError;
use crate::json_file::JsonFile;
use crate::models::{ConfigUpdate, Configuration};
use crate::repository::Repository;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone)]
pub struct ConfigRepository {
    file: JsonFile,
}

impl ConfigRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join(CONFIG_FILE_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Writes the default configuration if the file does not exist.
    pub async fn ensure_default(&self) -> Result<bool, StorageError> {
        self.file.write_if_missing(&Configuration::default()).await
    }

    /// Validates `update` against `current`, persists the result and returns it.
    /// On any validation failure nothing is written.
    pub async fn update(
        &self,
        current: &Configuration,
        update: &ConfigUpdate,
    ) -> Result<Configuration, StorageError> {
        let next = current.apply(update)?;
        self.save(&next).await?;
        info!(
            model = %next.model_name,
            context_limit = next.context_limit,
            "Configuration updated"
        );
        Ok(next)
    }
}

#[async_trait]
impl Repository<Configuration> for ConfigRepository {
    async fn load(&self) -> Configuration {
        let config: Configuration = self.file.read_or_else(Configuration::default).await;
        match config.validate() {
            Ok(()) => config,
            Err(e) => {
                warn!(path = %self.file.path().display(), error = %e, "Invalid configuration, using defaults");
                Configuration::default()
            }
        }
    }

    async fn save(&self, config: &Configuration) -> Result<(), StorageError> {
        self.file.write(config).await
    }
}
