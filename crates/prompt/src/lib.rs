//! # Prompt
//!
//! Chat message types and the system prompt composer.
//!
//! ## Format
//!
//! The system message embeds, in order:
//!
//! - **Identity**: assistant name, traits (comma-joined), backstory, goals, personality
//! - **Context** (optional): user name, traits, backstory; omitted when no user profile is set
//! - **Recent Events**: one `- event` line per key event, or [`NO_EVENTS_TEXT`]
//!
//! Without an assistant profile the composer returns [`FALLBACK_SYSTEM_MESSAGE`].
//!
//! ## External interactions
//!
//! - **Inference backend**: `ChatMessage` serializes to the `{role, content}` shape of chat APIs.
//! - **Persistence**: `Profile` serializes to one entry of `profiles.json`.

use serde::{Deserialize, Serialize};

/// Role of a message, one-to-one with the chat API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one element of the `messages` array sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }
}

/// A character description injected into the system prompt.
///
/// Replaced wholesale on update; callers hold clones, never patch fields of a live profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub traits: Vec<String>,
    pub backstory: String,
    pub goals: String,
    pub personality: String,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            traits: Vec::new(),
            backstory: String::new(),
            goals: String::new(),
            personality: String::new(),
        }
    }

    pub fn with_traits<I, S>(mut self, traits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.traits = traits.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_backstory(mut self, backstory: impl Into<String>) -> Self {
        self.backstory = backstory.into();
        self
    }

    pub fn with_goals(mut self, goals: impl Into<String>) -> Self {
        self.goals = goals.into();
        self
    }

    pub fn with_personality(mut self, personality: impl Into<String>) -> Self {
        self.personality = personality.into();
        self
    }

    /// Traits joined with ", " in stored order.
    pub fn traits_line(&self) -> String {
        self.traits.join(", ")
    }
}

/// System content used when no assistant profile is resolvable.
pub const FALLBACK_SYSTEM_MESSAGE: &str = "Basic AI assistant mode.";

/// Rendered in place of the event list when no key events exist.
pub const NO_EVENTS_TEXT: &str = "No significant events yet.";

/// Bullet marker prefixed to each rendered key event.
pub const EVENT_BULLET: &str = "- ";

/// Renders key events one per line, oldest first.
pub fn format_key_events<I, S>(events: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines: Vec<String> = events
        .into_iter()
        .map(|e| format!("{}{}", EVENT_BULLET, e.as_ref()))
        .collect();
    if lines.is_empty() {
        NO_EVENTS_TEXT.to_string()
    } else {
        lines.join("\n")
    }
}

/// Composes the system message from the active persona pair and the key event log.
///
/// Pure and deterministic: identical inputs yield identical output. Must be re-run, not patched,
/// whenever a profile or the event log changes.
///
/// # Arguments
///
/// * `assistant` - Persona the model plays; `None` yields [`FALLBACK_SYSTEM_MESSAGE`]
/// * `user` - Persona the human plays; `None` omits the context block
/// * `events` - Key events in chronological order
pub fn compose_system_message<I, S>(
    assistant: Option<&Profile>,
    user: Option<&Profile>,
    events: I,
) -> ChatMessage
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(assistant) = assistant else {
        return ChatMessage::system(FALLBACK_SYSTEM_MESSAGE);
    };

    let mut out = String::new();
    out.push_str(&format!(
        "You are {}. Fully embody this character:\n\n",
        assistant.name
    ));
    out.push_str("Your Identity:\n");
    out.push_str(&format!("- Name: {}\n", assistant.name));
    out.push_str(&format!("- Traits: {}\n", assistant.traits_line()));
    out.push_str(&format!("- Backstory: {}\n", assistant.backstory));
    out.push_str(&format!("- Goals: {}\n", assistant.goals));
    out.push_str(&format!("- Personality: {}\n\n", assistant.personality));

    if let Some(user) = user {
        out.push_str("Your Context:\n");
        out.push_str(&format!("- You are interacting with: {}\n", user.name));
        out.push_str(&format!("- Their traits: {}\n", user.traits_line()));
        out.push_str(&format!("- Their backstory: {}\n\n", user.backstory));
    }

    out.push_str("Recent Events:\n");
    out.push_str(&format_key_events(events));
    out.push_str("\n\n");
    out.push_str(
        "Stay completely in character, using all elements from your profile to shape your responses.",
    );

    ChatMessage::system(out)
}

/// Prefixes `content` with the speaker's display name: `"{name}:\n{content}"`.
///
/// The backend is prompted to continue in the persona's voice; this prefix is part of the wire format.
pub fn with_speaker(speaker: Option<&Profile>, content: &str) -> String {
    match speaker {
        Some(profile) => format!("{}:\n{}", profile.name, content),
        None => content.to_string(),
    }
}

/// Marker inserted after the system message when older turns are dropped by compaction.
///
/// No summary text is generated; the marker only tells the model that earlier turns existed.
pub fn summarized_marker(assistant_name: &str, user_name: &str) -> ChatMessage {
    ChatMessage::system(format!(
        "Previous conversation between {} and {} has been summarized.",
        assistant_name, user_name
    ))
}
