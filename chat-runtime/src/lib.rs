//! # chat-runtime
//!
//! Session-scoped conversation state and turn orchestration. Transports (the HTTP/WebSocket server,
//! the terminal chat) hold an `Arc<ChatService>` and address everything by session id.
//!
//! - [`session`] - One conversation: persona pair, key events, buffer, fast-mode flag
//! - [`registry`] - Session id to session map
//! - [`service`] - Chat turns, context status/trim, characters, key events, config and profiles

pub mod registry;
pub mod service;
pub mod session;

pub use registry::{SessionHandle, SessionManager};
pub use service::ChatService;
pub use session::{CharacterSummary, CurrentCharacters, Session};
