//! Persona store and active persona pair.
//!
//! The store maps a role key (`"user"`, `"assistant"`, or any other name) to a [`Profile`].
//! A session resolves two keys against it into [`CurrentPersonas`]; a key that does not resolve
//! leaves that side absent and composition degrades to the fallback text.

use std::collections::BTreeMap;

use prompt::{compose_system_message, ChatMessage, MessageRole, Profile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::events::KeyEventLog;

/// Role key conventionally used for the human side.
pub const DEFAULT_USER_ROLE: &str = "user";
/// Role key conventionally used for the model side.
pub const DEFAULT_ASSISTANT_ROLE: &str = "assistant";

/// Named character profiles keyed by role. Iteration order is sorted by role key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonaStore {
    profiles: BTreeMap<String, Profile>,
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, role: &str) -> Option<&Profile> {
        self.profiles.get(role)
    }

    /// Inserts or wholesale replaces the profile for `role`.
    pub fn set(&mut self, role: impl Into<String>, profile: Profile) {
        let role = role.into();
        debug!(role = %role, name = %profile.name, "Profile set");
        self.profiles.insert(role, profile);
    }

    /// Removes the profile for `role`. Returns false when it was absent.
    pub fn remove(&mut self, role: &str) -> bool {
        self.profiles.remove(role).is_some()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Profile)> {
        self.profiles.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl From<BTreeMap<String, Profile>> for PersonaStore {
    fn from(profiles: BTreeMap<String, Profile>) -> Self {
        Self { profiles }
    }
}

impl<K: Into<String>> FromIterator<(K, Profile)> for PersonaStore {
    fn from_iter<I: IntoIterator<Item = (K, Profile)>>(iter: I) -> Self {
        Self {
            profiles: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// The persona pair a session is currently using.
///
/// Holds snapshots: later edits to the store do not leak into a running conversation until
/// the pair is selected again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentPersonas {
    pub user: Option<Profile>,
    pub assistant: Option<Profile>,
}

impl CurrentPersonas {
    /// Resolves both role keys against the store. Unknown keys leave that side `None`.
    pub fn select(store: &PersonaStore, user_role: &str, assistant_role: &str) -> Self {
        let current = Self {
            user: store.get(user_role).cloned(),
            assistant: store.get(assistant_role).cloned(),
        };
        debug!(
            user_role = %user_role,
            assistant_role = %assistant_role,
            user = current.user.as_ref().map(|p| p.name.as_str()).unwrap_or("None"),
            assistant = current.assistant.as_ref().map(|p| p.name.as_str()).unwrap_or("None"),
            "Personas selected"
        );
        current
    }

    /// Selects the conventional `"user"` / `"assistant"` pair.
    pub fn select_default(store: &PersonaStore) -> Self {
        Self::select(store, DEFAULT_USER_ROLE, DEFAULT_ASSISTANT_ROLE)
    }

    /// Profile speaking for `role`; system messages have no speaker.
    pub fn speaker(&self, role: MessageRole) -> Option<&Profile> {
        match role {
            MessageRole::User => self.user.as_ref(),
            MessageRole::Assistant => self.assistant.as_ref(),
            MessageRole::System => None,
        }
    }

    /// Display name for `role`, or the capitalised role word when no profile is set.
    pub fn display_name(&self, role: MessageRole) -> &str {
        match (role, self.speaker(role)) {
            (_, Some(profile)) => profile.name.as_str(),
            (MessageRole::User, None) => "User",
            (MessageRole::Assistant, None) => "Assistant",
            (MessageRole::System, None) => "System",
        }
    }

    /// Composes the system message for this pair and the given event log.
    pub fn compose(&self, events: &KeyEventLog) -> ChatMessage {
        compose_system_message(self.assistant.as_ref(), self.user.as_ref(), events.iter())
    }
}
