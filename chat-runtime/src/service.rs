//! Turn orchestration and the session-level operations exposed to transports.
//!
//! A turn holds its session lock from the user append until the assistant reply is stored (or the
//! failure reported), so one session never has two turns in flight. Streamed fragments are sent to
//! the [`ChatSink`] as they arrive and each send is awaited before the next fragment is read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use llm_client::{GenerationRequest, LlmClient, StreamChunk};
use memory::context::DEFAULT_TRIM_PERCENTAGE;
use memory::{ContextStatus, PersonaStore, TrimReport};
use prompt::Profile;
use rhea_core::{ChatEvent, ChatSink, Result, RheaError};
use storage::{ConfigUpdate, Configuration, DataDir, Repository, StorageError};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument};

use crate::registry::{SessionHandle, SessionManager};
use crate::session::{CurrentCharacters, Session};

type ForwardFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

pub struct ChatService {
    llm: Arc<dyn LlmClient>,
    data_dir: DataDir,
    sessions: SessionManager,
    config: RwLock<Configuration>,
    profiles: RwLock<PersonaStore>,
}

impl ChatService {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        data_dir: DataDir,
        config: Configuration,
        profiles: PersonaStore,
    ) -> Self {
        Self {
            llm,
            data_dir,
            sessions: SessionManager::new(),
            config: RwLock::new(config),
            profiles: RwLock::new(profiles),
        }
    }

    /// Loads configuration and profiles from `data_dir`.
    pub async fn open(llm: Arc<dyn LlmClient>, data_dir: DataDir) -> Self {
        let config = data_dir.config().load().await;
        let profiles = data_dir.profiles().load().await;
        info!(
            model = %config.model_name,
            context_limit = config.context_limit,
            profiles = profiles.len(),
            "Chat service ready"
        );
        Self::new(llm, data_dir, config, profiles)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Returns the session for `session_id`, starting it on the default persona pair if new.
    pub async fn session(&self, session_id: &str) -> SessionHandle {
        if let Some(session) = self.sessions.get(session_id).await {
            return session;
        }
        let context_limit = self.config.read().await.context_limit;
        let store = self.profiles.read().await;
        self.sessions
            .get_or_create(session_id, || {
                info!(session_id = %session_id, context_limit, "Session started");
                Session::new(session_id, &store, context_limit)
            })
            .await
    }

    /// Live session for `session_id`, or a detached fresh one that is never registered. Read-only
    /// queries go through here so that asking about an unknown id does not start a session.
    async fn peek(&self, session_id: &str) -> SessionHandle {
        if let Some(session) = self.sessions.get(session_id).await {
            return session;
        }
        let context_limit = self.config.read().await.context_limit;
        let store = self.profiles.read().await;
        Arc::new(Mutex::new(Session::new(session_id, &store, context_limit)))
    }

    /// Drops the session and its buffer. Returns false when it was not live.
    pub async fn end_session(&self, session_id: &str) -> bool {
        let removed = self.sessions.remove(session_id).await;
        if removed {
            let live_sessions = self.sessions.len().await;
            info!(
                session_id = %session_id,
                live_sessions = live_sessions,
                "Session ended"
            );
        }
        removed
    }

    /// `{system: "Chat initialized. You are <user>, speaking with <assistant>"}`
    pub async fn greeting(&self, session_id: &str) -> ChatEvent {
        let session = self.session(session_id).await;
        let greeting = session.lock().await.greeting();
        ChatEvent::system(greeting)
    }

    /// Runs one chat turn and returns the assistant reply.
    ///
    /// With `stream`, every fragment is forwarded as a `chunk` event; the turn always ends with a
    /// `response` or `error` event on `sink`. A blank message is rejected before anything changes
    /// and nothing is sent. On a generation failure the user message stays but no assistant
    /// message is appended.
    #[instrument(skip(self, session_id, message, sink), fields(session_id = %session_id))]
    pub async fn run_turn(
        &self,
        session_id: &str,
        message: &str,
        sink: Arc<dyn ChatSink>,
        stream: bool,
    ) -> Result<String> {
        if message.trim().is_empty() {
            return Err(RheaError::Validation("Message is required".to_string()));
        }

        let (model, context_limit) = {
            let config = self.config.read().await;
            (config.model_name.clone(), config.context_limit)
        };

        let handle = self.session(session_id).await;
        let mut session = handle.lock().await;
        session.apply_context_limit(context_limit);
        session.append_user(message);

        let request =
            GenerationRequest::new(model.clone(), session.buffer().messages().to_vec(), context_limit);
        debug!(
            model = %model,
            message_count = request.messages.len(),
            stream,
            "Sending conversation to backend"
        );

        let generated = if stream {
            let character = session.assistant_name().to_string();
            let chunk_sink = sink.clone();
            let mut forward = move |chunk: StreamChunk| -> ForwardFuture {
                let sink = chunk_sink.clone();
                let character = character.clone();
                Box::pin(async move {
                    if !chunk.content.is_empty() {
                        sink.send(ChatEvent::chunk(chunk.content, Some(character)))
                            .await?;
                    }
                    Ok::<(), anyhow::Error>(())
                })
            };
            self.llm.get_llm_response_stream(request, &mut forward).await
        } else {
            self.llm.get_llm_response(request).await
        };

        match generated {
            Ok(reply) => {
                let compactions = session.complete_turn(&reply);
                info!(
                    reply_len = reply.len(),
                    message_count = session.buffer().len(),
                    compactions = compactions.len(),
                    "Turn completed"
                );
                drop(session);
                sink.send(ChatEvent::response(reply.clone())).await?;
                Ok(reply)
            }
            Err(e) => {
                drop(session);
                let message = generation_failure_message(&e, &model);
                error!(error = %e, model = %model, "Generation failed");
                if let Err(send_err) = sink.send(ChatEvent::error(message.clone())).await {
                    debug!(error = %send_err, "Could not deliver error event");
                }
                Err(RheaError::Generation(message))
            }
        }
    }

    /// Appends a key event and returns the full log.
    pub async fn add_key_event(&self, session_id: &str, event: &str) -> Result<Vec<String>> {
        let event = event.trim();
        if event.is_empty() {
            return Err(RheaError::Validation("Event content required".to_string()));
        }
        let handle = self.session(session_id).await;
        let mut session = handle.lock().await;
        session.add_key_event(event);
        info!(session_id = %session_id, events = session.events().len(), "Key event added");
        Ok(session.events().as_slice().to_vec())
    }

    pub async fn key_events(&self, session_id: &str) -> Vec<String> {
        let handle = self.peek(session_id).await;
        let session = handle.lock().await;
        session.events().as_slice().to_vec()
    }

    /// Resets the buffer of a live session. An unknown id is already clear.
    pub async fn clear(&self, session_id: &str) {
        if let Some(handle) = self.sessions.get(session_id).await {
            handle.lock().await.clear();
        }
    }

    pub async fn context_status(&self, session_id: &str) -> ContextStatus {
        let handle = self.peek(session_id).await;
        let context_limit = self.config.read().await.context_limit;
        let mut session = handle.lock().await;
        session.apply_context_limit(context_limit);
        session.status()
    }

    /// Trims to `target_percentage` of the context limit (50 when absent).
    pub async fn trim_context(&self, session_id: &str, target_percentage: Option<f64>) -> TrimReport {
        let target = target_percentage.unwrap_or(DEFAULT_TRIM_PERCENTAGE);
        let handle = self.peek(session_id).await;
        let context_limit = self.config.read().await.context_limit;
        let mut session = handle.lock().await;
        session.apply_context_limit(context_limit);
        let report = session.trim(target);
        info!(
            session_id = %session_id,
            target_percentage = target,
            remaining = report.remaining_messages,
            "Context trimmed"
        );
        report
    }

    /// Selects the persona pair for a session. Roles missing from the store come back as `None`.
    pub async fn select_characters(
        &self,
        session_id: &str,
        user_role: &str,
        assistant_role: &str,
    ) -> CurrentCharacters {
        let handle = self.session(session_id).await;
        let mut session = handle.lock().await;
        let store = self.profiles.read().await;
        session.select_characters(&store, user_role, assistant_role);
        session.current_characters()
    }

    pub async fn current_characters(&self, session_id: &str) -> CurrentCharacters {
        let handle = self.peek(session_id).await;
        let session = handle.lock().await;
        session.current_characters()
    }

    /// Stores the flag and returns the acknowledgement event.
    pub async fn set_fast_mode(&self, session_id: &str, enabled: bool) -> ChatEvent {
        let handle = self.session(session_id).await;
        handle.lock().await.set_fast_mode(enabled);
        ChatEvent::system(format!(
            "Fast mode {}",
            if enabled { "enabled" } else { "disabled" }
        ))
    }

    pub async fn config(&self) -> Configuration {
        self.config.read().await.clone()
    }

    /// Validates and persists `update`, then pushes the context limit to every live session.
    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<Configuration> {
        let next = {
            let mut config = self.config.write().await;
            let next = self
                .data_dir
                .config()
                .update(&config, update)
                .await
                .map_err(from_storage)?;
            *config = next.clone();
            next
        };
        for handle in self.sessions.all().await {
            handle.lock().await.apply_context_limit(next.context_limit);
        }
        Ok(next)
    }

    pub async fn profiles(&self) -> PersonaStore {
        self.profiles.read().await.clone()
    }

    /// Creates or replaces the profile for `role` and persists the store.
    pub async fn save_profile(&self, role: &str, profile: Profile) -> Result<()> {
        let role = role.trim();
        if role.is_empty() {
            return Err(RheaError::Validation(
                "Role and profile data required".to_string(),
            ));
        }
        let mut store = self.profiles.write().await;
        let mut next = store.clone();
        next.set(role, profile);
        self.data_dir
            .profiles()
            .save(&next)
            .await
            .map_err(from_storage)?;
        *store = next;
        info!(role = %role, "Profile saved");
        Ok(())
    }

    /// Deletes the profile for `role`; `NotFound` when there is none.
    pub async fn remove_profile(&self, role: &str) -> Result<()> {
        let role = role.trim();
        if role.is_empty() {
            return Err(RheaError::Validation("Role parameter required".to_string()));
        }
        let mut store = self.profiles.write().await;
        let mut next = store.clone();
        if !next.remove(role) {
            return Err(RheaError::NotFound("Profile not found".to_string()));
        }
        self.data_dir
            .profiles()
            .save(&next)
            .await
            .map_err(from_storage)?;
        *store = next;
        info!(role = %role, "Profile deleted");
        Ok(())
    }
}

fn generation_failure_message(err: &anyhow::Error, model: &str) -> String {
    format!(
        "Error: {}. Please ensure Ollama is running with: ollama run {}",
        err, model
    )
}

fn from_storage(err: StorageError) -> RheaError {
    match err {
        StorageError::InvalidConfig(message) => RheaError::Validation(message),
        StorageError::NotFound(message) => RheaError::NotFound(message),
        other => RheaError::Storage(other.to_string()),
    }
}
