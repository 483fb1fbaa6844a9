//! Storage crate: JSON persistence for conversation settings and character profiles.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – Configuration, ConfigUpdate, default profiles
//! - [`repository`] – Repository trait (whole-document load/save)
//! - [`config_repo`] – ConfigRepository (`config.json`)
//! - [`profile_repo`] – ProfileRepository (`profiles.json`)
//! - [`data_dir`] – DataDir, creates the directory and default documents
//!
//! Malformed or invalid documents never fail a load: a warning is logged and defaults are used.

mod config_repo;
mod data_dir;
mod error;
mod json_file;
mod models;
mod profile_repo;
mod repository;

#[cfg(test)]
mod config_repo_test;

pub use config_repo::{ConfigRepository, CONFIG_FILE_NAME};
pub use data_dir::DataDir;
pub use error::StorageError;
pub use json_file::JsonFile;
pub use models::{
    default_profiles, ConfigUpdate, Configuration, DEFAULT_CONTEXT_LIMIT, DEFAULT_MAX_WIDTH,
    DEFAULT_MODEL_NAME, DEFAULT_REFRESH_RATE,
};
pub use profile_repo::{ProfileRepository, PROFILES_FILE_NAME};
pub use repository::Repository;
