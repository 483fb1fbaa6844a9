//! # Memory Crate
//!
//! Conversation state for one chat session: who is speaking, what has happened, and the
//! bounded message history sent to the inference backend.
//!
//! ## Modules
//!
//! - [`persona`] - Persona store (role key → profile) and the active persona pair
//! - [`events`] - Append-only key event log injected into every system prompt
//! - [`context`] - Conversation buffer, budget policy, length proxies, status and trim reports
//!
//! ## Quick Start
//!
//! ```rust
//! use memory::{BudgetPolicy, ConversationBuffer, CurrentPersonas, KeyEventLog, PersonaStore};
//! use prompt::{MessageRole, Profile};
//!
//! let mut store = PersonaStore::new();
//! store.set("assistant", Profile::new("Rhea"));
//! store.set("user", Profile::new("Ana"));
//!
//! let personas = CurrentPersonas::select(&store, "user", "assistant");
//! let events = KeyEventLog::new();
//! let mut buffer = ConversationBuffer::new(BudgetPolicy::new(5000), personas.compose(&events));
//!
//! buffer.append(MessageRole::User, "Hello!", &personas);
//! assert_eq!(buffer.messages()[1].content, "Ana:\nHello!");
//! ```
//!
//! ## External Interactions
//!
//! - **Persistence**: `PersonaStore` is loaded from and saved to `profiles.json` by the storage crate
//! - **Inference backend**: `ConversationBuffer::messages()` is the ordered message list sent per turn
//! - **Transport**: `ContextStatus` and `TrimReport` are returned as JSON by the server

pub mod context;
pub mod events;
pub mod persona;

pub use context::{
    count_chars, count_words, BudgetPolicy, Compaction, CompactionKind, ContextStatus,
    ConversationBuffer, LengthProxy, TrimReport,
};
pub use events::KeyEventLog;
pub use persona::{CurrentPersonas, PersonaStore};
