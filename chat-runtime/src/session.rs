//! Session-scoped conversation state.
//!
//! Every mutable piece of a conversation lives here, keyed by session id in the registry: the
//! selected persona pair, key events, the buffer and its turn counter. Sessions never share state.

use memory::persona::{DEFAULT_ASSISTANT_ROLE, DEFAULT_USER_ROLE};
use memory::{
    BudgetPolicy, Compaction, ContextStatus, ConversationBuffer, CurrentPersonas, KeyEventLog,
    PersonaStore, TrimReport,
};
use prompt::{MessageRole, Profile};
use serde::Serialize;

/// Public view of a selected character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSummary {
    pub name: String,
    pub traits: Vec<String>,
    pub personality: String,
}

impl From<&Profile> for CharacterSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            traits: profile.traits.clone(),
            personality: profile.personality.clone(),
        }
    }
}

/// `{assistant, user}`; a side is `null` when its role did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentCharacters {
    pub assistant: Option<CharacterSummary>,
    pub user: Option<CharacterSummary>,
}

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    user_role: String,
    assistant_role: String,
    personas: CurrentPersonas,
    events: KeyEventLog,
    buffer: ConversationBuffer,
    fast_mode: bool,
}

impl Session {
    /// Starts a session on the default `user`/`assistant` pair.
    pub fn new(id: impl Into<String>, store: &PersonaStore, context_limit: usize) -> Self {
        let personas = CurrentPersonas::select_default(store);
        let events = KeyEventLog::new();
        let buffer = ConversationBuffer::new(
            BudgetPolicy::new(context_limit),
            personas.compose(&events),
        );
        Self {
            id: id.into(),
            user_role: DEFAULT_USER_ROLE.to_string(),
            assistant_role: DEFAULT_ASSISTANT_ROLE.to_string(),
            personas,
            events,
            buffer,
            fast_mode: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn buffer(&self) -> &ConversationBuffer {
        &self.buffer
    }

    pub fn personas(&self) -> &CurrentPersonas {
        &self.personas
    }

    pub fn roles(&self) -> (&str, &str) {
        (&self.user_role, &self.assistant_role)
    }

    pub fn events(&self) -> &KeyEventLog {
        &self.events
    }

    pub fn fast_mode(&self) -> bool {
        self.fast_mode
    }

    pub fn set_fast_mode(&mut self, enabled: bool) {
        self.fast_mode = enabled;
    }

    /// Display name of the assistant persona, used to tag streamed chunks.
    pub fn assistant_name(&self) -> &str {
        self.personas.display_name(MessageRole::Assistant)
    }

    /// "Chat initialized. You are <user>, speaking with <assistant>"
    pub fn greeting(&self) -> String {
        format!(
            "Chat initialized. You are {}, speaking with {}",
            self.personas.display_name(MessageRole::User),
            self.personas.display_name(MessageRole::Assistant)
        )
    }

    /// Selects a new persona pair and recomposes the system message. History is kept.
    pub fn select_characters(&mut self, store: &PersonaStore, user_role: &str, assistant_role: &str) {
        self.user_role = user_role.to_string();
        self.assistant_role = assistant_role.to_string();
        self.personas = CurrentPersonas::select(store, user_role, assistant_role);
        self.buffer.refresh_system(self.personas.compose(&self.events));
    }

    pub fn current_characters(&self) -> CurrentCharacters {
        CurrentCharacters {
            assistant: self.personas.assistant.as_ref().map(CharacterSummary::from),
            user: self.personas.user.as_ref().map(CharacterSummary::from),
        }
    }

    /// Records a key event and recomposes the system message so it takes effect next turn.
    pub fn add_key_event(&mut self, event: &str) {
        self.events.push(event);
        self.buffer.refresh_system(self.personas.compose(&self.events));
    }

    /// Drops every turn; the buffer restarts from a freshly composed system message.
    pub fn clear(&mut self) {
        self.buffer.reset(self.personas.compose(&self.events));
    }

    /// Adopts a new context limit; takes effect from the next append.
    pub fn apply_context_limit(&mut self, context_limit: usize) {
        if self.buffer.policy().context_limit() != context_limit {
            self.buffer.set_policy(BudgetPolicy::new(context_limit));
        }
    }

    pub fn append_user(&mut self, text: &str) -> Option<Compaction> {
        self.buffer.append(MessageRole::User, text, &self.personas)
    }

    /// Appends the completed assistant reply and closes the turn.
    pub fn complete_turn(&mut self, reply: &str) -> Vec<Compaction> {
        let threshold = self.buffer.append(MessageRole::Assistant, reply, &self.personas);
        let periodic = self.buffer.finish_turn();
        threshold.into_iter().chain(periodic).collect()
    }

    pub fn status(&self) -> ContextStatus {
        self.buffer.status()
    }

    pub fn trim(&mut self, target_percentage: f64) -> TrimReport {
        self.buffer.trim_to_target(target_percentage)
    }
}
