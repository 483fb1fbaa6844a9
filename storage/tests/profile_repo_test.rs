//! Integration tests for [`storage::ProfileRepository`].
//!
//! Covers the default profiles, round-tripping a persona store, and fallback on a malformed file.

use memory::PersonaStore;
use prompt::Profile;
use storage::{default_profiles, DataDir, ProfileRepository, Repository};

/// **Test: A fresh data directory gets the default assistant and user profiles.**
///
/// **Setup:** Empty temp dir.
/// **Action:** `DataDir::open`, then `profiles().load()`.
/// **Expected:** Roles `assistant` ("Assistant", helpful/friendly) and `user` ("User", human).
#[tokio::test]
async fn test_default_profiles_written_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = DataDir::open(dir.path()).await.unwrap();

    let store = data_dir.profiles().load().await;
    assert_eq!(store.roles().collect::<Vec<_>>(), vec!["assistant", "user"]);
    let assistant = store.get("assistant").unwrap();
    assert_eq!(assistant.name, "Assistant");
    assert_eq!(assistant.traits, vec!["helpful", "friendly"]);
    assert_eq!(store.get("user").unwrap().traits, vec!["human"]);
}

/// **Test: Saved profiles load back unchanged, including extra roles.**
///
/// **Setup:** Default store plus a `narrator` profile.
/// **Action:** `save`, then `load` through a new repository instance.
/// **Expected:** Stores are equal.
#[tokio::test]
async fn test_save_then_load_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let repo = ProfileRepository::new(dir.path());

    let mut store = default_profiles();
    store.set(
        "narrator",
        Profile::new("Rhea")
            .with_traits(["witty", "curious"])
            .with_backstory("Grew up in a lighthouse")
            .with_goals("Find the lost map")
            .with_personality("Warm"),
    );
    repo.save(&store).await.unwrap();

    let loaded = ProfileRepository::new(dir.path()).load().await;
    assert_eq!(loaded, store);
}

/// **Test: Removing a profile persists the removal.**
#[tokio::test]
async fn test_remove_profile_persists() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = DataDir::open(dir.path()).await.unwrap();

    let mut store = data_dir.profiles().load().await;
    assert!(store.remove("user"));
    assert!(!store.remove("user"));
    data_dir.profiles().save(&store).await.unwrap();

    let loaded = data_dir.profiles().load().await;
    assert!(loaded.get("user").is_none());
    assert_eq!(loaded.len(), 1);
}

/// **Test: A malformed profiles file falls back to the defaults without failing.**
#[tokio::test]
async fn test_malformed_profiles_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("profiles.json"), r#"{"user": {"name": 3}}"#).unwrap();

    let store: PersonaStore = ProfileRepository::new(dir.path()).load().await;
    assert_eq!(store, default_profiles());
}
