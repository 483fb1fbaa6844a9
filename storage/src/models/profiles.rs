//! Profiles written to a fresh `profiles.json`.

use memory::persona::{DEFAULT_ASSISTANT_ROLE, DEFAULT_USER_ROLE};
use memory::PersonaStore;
use prompt::Profile;

/// A generic assistant and user so a new installation can chat immediately.
pub fn default_profiles() -> PersonaStore {
    let mut store = PersonaStore::new();
    store.set(
        DEFAULT_ASSISTANT_ROLE,
        Profile::new("Assistant")
            .with_traits(["helpful", "friendly"])
            .with_backstory("A helpful AI assistant.")
            .with_goals("To help users effectively.")
            .with_personality("Professional and courteous."),
    );
    store.set(
        DEFAULT_USER_ROLE,
        Profile::new("User")
            .with_traits(["human"])
            .with_backstory("A user of the system.")
            .with_goals("To interact with the assistant.")
            .with_personality("Regular user."),
    );
    store
}
