//! # LLM client abstraction
//!
//! Defines the [`LlmClient`] trait (the inference gateway consumed by the chat runtime) and an
//! Ollama implementation. Transport-agnostic.
//!
//! The stream method uses a boxed callback so that [`LlmClient`] is object-safe (dyn compatible).

use anyhow::Result;
use async_trait::async_trait;
use ollama_client::ChatRequestMessage;
use prompt::ChatMessage;
use std::future::Future;
use std::pin::Pin;

mod ollama_llm;

pub use ollama_llm::OllamaLlmClient;

/// A fragment of streamed LLM output; aligned with `ollama_client::StreamChunk`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    pub content: String,
    pub done: bool,
}

/// Type-erased callback for stream chunks so that [`LlmClient`] is dyn compatible.
pub type StreamChunkCallback =
    dyn FnMut(StreamChunk) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send;

/// Everything the backend needs for one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model identifier, passed through uninterpreted.
    pub model: String,
    /// Full ordered conversation, system message first.
    pub messages: Vec<ChatMessage>,
    /// Context window hint for the backend.
    pub context_limit: usize,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, context_limit: usize) -> Self {
        Self {
            model: model.into(),
            messages,
            context_limit,
        }
    }
}

/// LLM client interface: request completion or streamed completion from a list of messages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Returns the model reply text for the given request.
    async fn get_llm_response(&self, request: GenerationRequest) -> Result<String>;

    /// Streamed completion: invokes `callback` for each fragment in arrival order and returns the full
    /// reply text. An `Err` may come after some fragments were already delivered.
    async fn get_llm_response_stream(
        &self,
        request: GenerationRequest,
        callback: &mut StreamChunkCallback,
    ) -> Result<String>;
}

/// Converts a single [`ChatMessage`] into the Ollama wire format.
fn chat_message_to_ollama(msg: &ChatMessage) -> ChatRequestMessage {
    ChatRequestMessage::new(msg.role.as_str(), msg.content.clone())
}
