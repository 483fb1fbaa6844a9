//! # Ollama API client
//!
//! Thin wrapper around the Ollama `/api/chat` endpoint for chat completion (non-stream and stream).
//! Streaming responses are newline-delimited JSON; each line carries one content fragment.
//!
//! ## External interactions
//!
//! - **Ollama**: HTTP POST `{base_url}/api/chat` with `{model, messages, stream, options.num_ctx}`.

use std::time::Instant;

use anyhow::{Context, Result};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

/// Default local Ollama address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// One element of the request `messages` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequestMessage {
    pub role: String,
    pub content: String,
}

impl ChatRequestMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Model options forwarded with each request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatOptions {
    /// Context window size hint (`num_ctx`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_ctx: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatRequestMessage],
    stream: bool,
    options: &'a ChatOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: String,
}

/// One NDJSON line (or the whole body when not streaming).
#[derive(Debug, Deserialize)]
struct ChatResponseLine {
    #[serde(default)]
    message: Option<ChatResponseMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// A fragment of streamed completion content and whether the stream is finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChunk {
    /// Text of this fragment.
    pub content: String,
    /// True if the backend marked this line as the last one.
    pub done: bool,
}

/// Ollama chat client. Cheap to clone; the HTTP connection pool is shared.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaClient {
    /// Builds a client for [`DEFAULT_BASE_URL`].
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Builds a client for a custom base URL (trailing slashes are ignored).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    async fn send(
        &self,
        model: &str,
        messages: &[ChatRequestMessage],
        options: &ChatOptions,
        stream: bool,
    ) -> Result<reqwest::Response> {
        let request = ChatRequest {
            model,
            messages,
            stream,
            options,
        };
        let response = self
            .http
            .post(self.chat_url())
            .json(&request)
            .send()
            .await
            .with_context(|| format!("Failed to reach Ollama at {}", self.base_url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("Ollama returned {}: {}", status, message);
        }
        Ok(response)
    }

    /// Sends a chat request and returns the full assistant reply.
    pub async fn chat(
        &self,
        model: &str,
        messages: Vec<ChatRequestMessage>,
        options: ChatOptions,
    ) -> Result<String> {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            num_ctx = ?options.num_ctx,
            "Ollama chat request"
        );

        let response = self.send(model, &messages, &options, false).await?;
        let line: ChatResponseLine = response
            .json()
            .await
            .context("Failed to decode Ollama chat response")?;
        if let Some(error) = line.error {
            anyhow::bail!("Ollama error: {}", error);
        }
        log_usage(&line);
        Ok(line.message.map(|m| m.content).unwrap_or_default())
    }

    /// Streams a chat completion, invoking `callback` once per fragment as it arrives.
    ///
    /// The next line is not read until the callback's future resolves. Returns the full
    /// concatenated reply. A transport failure or an `error` line ends the stream with `Err`;
    /// fragments already passed to the callback stay delivered.
    pub async fn chat_stream<F, Fut>(
        &self,
        model: &str,
        messages: Vec<ChatRequestMessage>,
        options: ChatOptions,
        mut callback: F,
    ) -> Result<String>
    where
        F: FnMut(StreamChunk) -> Fut,
        Fut: std::future::Future<Output = Result<()>>,
    {
        tracing::info!(
            model = %model,
            message_count = messages.len(),
            num_ctx = ?options.num_ctx,
            "Ollama chat_stream request"
        );

        let started = Instant::now();
        let response = self.send(model, &messages, &options, true).await?;
        let mut stream = response.bytes_stream();

        let mut full_response = String::new();
        // Bytes received but not yet terminated by '\n'.
        let mut pending: Vec<u8> = Vec::new();
        let mut fragments = 0usize;

        while let Some(bytes) = stream.next().await {
            let bytes = bytes.context("Stream error")?;
            pending.extend_from_slice(&bytes);

            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = pending.drain(..=pos).collect();
                if let Some(chunk) = parse_line(&line[..line.len() - 1])? {
                    full_response.push_str(&chunk.content);
                    fragments += 1;
                    callback(chunk).await?;
                }
            }
        }

        if let Some(chunk) = parse_line(&pending)? {
            full_response.push_str(&chunk.content);
            fragments += 1;
            callback(chunk).await?;
        }

        tracing::info!(
            model = %model,
            fragments,
            response_len = full_response.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ollama chat_stream finished"
        );
        Ok(full_response)
    }
}

/// Parses one NDJSON line. Blank lines and content-free lines yield `None`.
fn parse_line(line: &[u8]) -> Result<Option<StreamChunk>> {
    let text = std::str::from_utf8(line).context("Stream line is not UTF-8")?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let line: ChatResponseLine =
        serde_json::from_str(text).with_context(|| format!("Invalid stream line: {}", text))?;
    if let Some(error) = line.error {
        anyhow::bail!("Ollama error: {}", error);
    }
    if line.done {
        log_usage(&line);
    }
    let content = line.message.map(|m| m.content).unwrap_or_default();
    if content.is_empty() {
        return Ok(None);
    }
    Ok(Some(StreamChunk {
        content,
        done: line.done,
    }))
}

fn log_usage(line: &ChatResponseLine) {
    tracing::info!(
        prompt_tokens = ?line.prompt_eval_count,
        completion_tokens = ?line.eval_count,
        done_reason = ?line.done_reason,
        "Ollama chat usage"
    );
}
