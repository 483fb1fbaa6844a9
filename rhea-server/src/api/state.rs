use std::sync::Arc;

use chat_runtime::ChatService;
use rhea_core::DEFAULT_SESSION_ID;
use serde::Deserialize;

/// Application state shared across all handlers.
pub type AppState = Arc<ChatService>;

/// `?session=<id>`; absent or blank means the default session.
#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    pub session: Option<String>,
}

impl SessionQuery {
    pub fn id(&self) -> &str {
        self.session
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SESSION_ID)
    }
}
