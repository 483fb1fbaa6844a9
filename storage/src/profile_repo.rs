//! Profile repository: `profiles.json`, role key to profile.

use std::path::Path;

use async_trait::async_trait;
use memory::PersonaStore;
use tracing::debug;

use crate::error::StorageError;
use crate::json_file::JsonFile;
use crate::models::default_profiles;
use crate::repository::Repository;

pub const PROFILES_FILE_NAME: &str = "profiles.json";

#[derive(Debug, Clone)]
pub struct ProfileRepository {
    file: JsonFile,
}

impl ProfileRepository {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            file: JsonFile::new(data_dir.join(PROFILES_FILE_NAME)),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Writes the default assistant and user profiles if the file does not exist.
    pub async fn ensure_default(&self) -> Result<bool, StorageError> {
        self.file.write_if_missing(&default_profiles()).await
    }
}

#[async_trait]
impl Repository<PersonaStore> for ProfileRepository {
    async fn load(&self) -> PersonaStore {
        self.file.read_or_else(default_profiles).await
    }

    async fn save(&self, store: &PersonaStore) -> Result<(), StorageError> {
        self.file.write(store).await?;
        debug!(count = store.len(), "Profiles saved");
        Ok(())
    }
}
