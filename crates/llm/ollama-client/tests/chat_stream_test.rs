//! Tests for [`ollama_client::OllamaClient`] against a mock HTTP server.
//!
//! Covers: request shape (model, stream flag, num_ctx), per-fragment streaming, mid-stream error
//! lines, HTTP error bodies, and non-stream replies. No real Ollama is contacted.

use std::sync::{Arc, Mutex};

use mockito::Matcher;
use ollama_client::{ChatOptions, ChatRequestMessage, OllamaClient, StreamChunk};
use serde_json::json;

fn messages() -> Vec<ChatRequestMessage> {
    vec![
        ChatRequestMessage::new("system", "You are Rhea."),
        ChatRequestMessage::new("user", "Ana:\nhello"),
    ]
}

fn options() -> ChatOptions {
    ChatOptions { num_ctx: Some(5000) }
}

fn collector() -> (Arc<Mutex<Vec<StreamChunk>>>, impl FnMut(StreamChunk) -> futures::future::Ready<anyhow::Result<()>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let callback = move |chunk: StreamChunk| {
        sink.lock().unwrap().push(chunk);
        futures::future::ready(Ok(()))
    };
    (seen, callback)
}

/// **Test: Each NDJSON line is forwarded as one fragment; the full reply is their concatenation.**
#[tokio::test]
async fn test_chat_stream_forwards_each_fragment() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"message":{"role":"assistant","content":"Hel"},"done":false}"#, "\n",
        r#"{"message":{"role":"assistant","content":"lo"},"done":false}"#, "\n",
        r#"{"message":{"role":"assistant","content":""},"done":true,"done_reason":"stop","eval_count":2}"#, "\n",
    );
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({
            "model": "test-model",
            "stream": true,
            "options": { "num_ctx": 5000 },
            "messages": [
                { "role": "system", "content": "You are Rhea." },
                { "role": "user", "content": "Ana:\nhello" }
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/x-ndjson")
        .with_body(body)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(server.url());
    let (seen, callback) = collector();
    let full = client
        .chat_stream("test-model", messages(), options(), callback)
        .await
        .unwrap();

    assert_eq!(full, "Hello");
    let seen = seen.lock().unwrap();
    let parts: Vec<&str> = seen.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(parts, vec!["Hel", "lo"]);
    mock.assert_async().await;
}

/// **Test: An error line after two fragments fails the call; both fragments were already delivered.**
#[tokio::test]
async fn test_chat_stream_error_line_after_fragments() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"message":{"content":"Once"},"done":false}"#, "\n",
        r#"{"message":{"content":" upon"},"done":false}"#, "\n",
        r#"{"error":"model runner crashed"}"#, "\n",
    );
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(server.url());
    let (seen, callback) = collector();
    let err = client
        .chat_stream("test-model", messages(), options(), callback)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("model runner crashed"));
    assert_eq!(seen.lock().unwrap().len(), 2);
}

/// **Test: A final line without trailing newline is still parsed.**
#[tokio::test]
async fn test_chat_stream_last_line_without_newline() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"message":{"content":"a"},"done":false}"#, "\n",
        r#"{"message":{"content":"b"},"done":true}"#,
    );
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(server.url());
    let (seen, callback) = collector();
    let full = client
        .chat_stream("test-model", messages(), options(), callback)
        .await
        .unwrap();
    assert_eq!(full, "ab");
    assert!(seen.lock().unwrap()[1].done);
}

/// **Test: Non-success status surfaces the backend's error text.**
#[tokio::test]
async fn test_http_error_body_is_reported() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(404)
        .with_body(r#"{"error":"model 'ghost' not found"}"#)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(format!("{}/", server.url()));
    let (seen, callback) = collector();
    let err = client
        .chat_stream("ghost", messages(), options(), callback)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("404"));
    assert!(err.to_string().contains("model 'ghost' not found"));
    assert!(seen.lock().unwrap().is_empty());
}

/// **Test: A failing callback stops the stream and propagates its error.**
#[tokio::test]
async fn test_callback_error_aborts_stream() {
    let mut server = mockito::Server::new_async().await;
    let body = concat!(
        r#"{"message":{"content":"x"},"done":false}"#, "\n",
        r#"{"message":{"content":"y"},"done":false}"#, "\n",
    );
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(server.url());
    let mut calls = 0;
    let err = client
        .chat_stream("test-model", messages(), options(), |_chunk| {
            calls += 1;
            futures::future::ready(Err(anyhow::anyhow!("client went away")))
        })
        .await
        .unwrap_err();
    assert_eq!(calls, 1);
    assert!(err.to_string().contains("client went away"));
}

/// **Test: Non-stream chat sends stream=false and returns the message content.**
#[tokio::test]
async fn test_chat_non_stream() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(json!({ "stream": false })))
        .with_status(200)
        .with_body(r#"{"message":{"role":"assistant","content":"Hi Ana."},"done":true}"#)
        .create_async()
        .await;

    let client = OllamaClient::with_base_url(server.url());
    let reply = client.chat("test-model", messages(), options()).await.unwrap();
    assert_eq!(reply, "Hi Ana.");
    mock.assert_async().await;
}

/// **Test: num_ctx is omitted when not set.**
#[test]
fn test_options_skip_unset_num_ctx() {
    assert_eq!(serde_json::to_string(&ChatOptions::default()).unwrap(), "{}");
    assert_eq!(
        serde_json::to_string(&options()).unwrap(),
        r#"{"num_ctx":5000}"#
    );
}
