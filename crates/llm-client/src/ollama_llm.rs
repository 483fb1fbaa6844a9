//! Ollama-backed [`LlmClient`].

use anyhow::Result;
use async_trait::async_trait;
use ollama_client::{ChatOptions, OllamaClient, StreamChunk as OllamaStreamChunk};
use tracing::instrument;

use super::{chat_message_to_ollama, GenerationRequest, LlmClient, StreamChunk, StreamChunkCallback};

/// [`LlmClient`] implementation over `ollama-client`. The request's context limit is sent as `num_ctx`.
#[derive(Clone, Debug, Default)]
pub struct OllamaLlmClient {
    client: OllamaClient,
}

impl OllamaLlmClient {
    pub fn new() -> Self {
        Self {
            client: OllamaClient::new(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: OllamaClient::with_base_url(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

fn options_for(request: &GenerationRequest) -> ChatOptions {
    ChatOptions {
        num_ctx: Some(request.context_limit),
    }
}

#[async_trait]
impl LlmClient for OllamaLlmClient {
    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn get_llm_response(&self, request: GenerationRequest) -> Result<String> {
        let messages = request.messages.iter().map(chat_message_to_ollama).collect();
        self.client
            .chat(&request.model, messages, options_for(&request))
            .await
    }

    #[instrument(skip(self, request, callback), fields(model = %request.model, messages = request.messages.len()))]
    async fn get_llm_response_stream(
        &self,
        request: GenerationRequest,
        callback: &mut StreamChunkCallback,
    ) -> Result<String> {
        let messages = request.messages.iter().map(chat_message_to_ollama).collect();
        self.client
            .chat_stream(
                &request.model,
                messages,
                options_for(&request),
                |chunk: OllamaStreamChunk| {
                    callback(StreamChunk {
                        content: chunk.content,
                        done: chunk.done,
                    })
                },
            )
            .await
            .map_err(|e| anyhow::anyhow!("Stream error: {}", e))
    }
}
