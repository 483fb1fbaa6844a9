//! Session registry: one [`Session`] per session id, created on first use.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use crate::session::Session;

pub type SessionHandle = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating it with `init` when absent.
    pub async fn get_or_create<F>(&self, id: &str, init: F) -> SessionHandle
    where
        F: FnOnce() -> Session,
    {
        if let Some(session) = self.sessions.read().await.get(id) {
            return session.clone();
        }
        self.sessions
            .write()
            .await
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(init())))
            .clone()
    }

    pub async fn get(&self, id: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Snapshot of every live session handle.
    pub async fn all(&self) -> Vec<SessionHandle> {
        self.sessions.read().await.values().cloned().collect()
    }
}
