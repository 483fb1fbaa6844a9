//! Unit tests for ConfigRepository.
//!
//! Covers default document creation, parse fallback, invalid values and typed updates.

use crate::config_repo::ConfigRepository;
use crate::data_dir::DataDir;
use crate::error::StorageError;
use crate::models::{ConfigUpdate, Configuration};
use crate::repository::Repository;
use serde_json::json;

#[tokio::test]
async fn test_open_writes_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = DataDir::open(dir.path().join(".rhea")).await.unwrap();

    assert!(data_dir.config().path().exists());
    let raw = std::fs::read_to_string(data_dir.config().path()).unwrap();
    let on_disk: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        on_disk,
        json!({
            "model_name": "fluffy/l3-8b-stheno-v3.2:latest",
            "context_limit": 5000,
            "refresh_rate": 4,
            "max_width": 120
        })
    );
    assert_eq!(data_dir.config().load().await, Configuration::default());
}

#[tokio::test]
async fn test_open_keeps_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let custom = json!({"model_name": "llama3", "context_limit": 2048, "refresh_rate": 8, "max_width": 80});
    std::fs::write(dir.path().join("config.json"), custom.to_string()).unwrap();

    let data_dir = DataDir::open(dir.path()).await.unwrap();
    let config = data_dir.config().load().await;
    assert_eq!(config.model_name, "llama3");
    assert_eq!(config.context_limit, 2048);
}

#[tokio::test]
async fn test_malformed_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let repo = ConfigRepository::new(dir.path());
    assert_eq!(repo.load().await, Configuration::default());
}

#[tokio::test]
async fn test_zero_limit_in_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let bad = json!({"model_name": "m", "context_limit": 0, "refresh_rate": 4, "max_width": 120});
    std::fs::write(dir.path().join("config.json"), bad.to_string()).unwrap();

    let repo = ConfigRepository::new(dir.path());
    assert_eq!(repo.load().await.context_limit, 5000);
}

#[tokio::test]
async fn test_update_persists_valid_change() {
    let dir = tempfile::tempdir().unwrap();
    let repo = ConfigRepository::new(dir.path());
    let update = ConfigUpdate::from_json(json!({"context_limit": 100, "model_name": "mistral"})).unwrap();

    let next = repo.update(&Configuration::default(), &update).await.unwrap();
    assert_eq!(next.context_limit, 100);
    assert_eq!(repo.load().await, next);
}

#[tokio::test]
async fn test_rejected_update_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let repo = ConfigRepository::new(dir.path());
    let update = ConfigUpdate {
        context_limit: Some(0),
        ..Default::default()
    };

    let err = repo.update(&Configuration::default(), &update).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidConfig(_)));
    assert!(!repo.path().exists());
}
