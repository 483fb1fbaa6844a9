use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::stream;
use rhea_core::{ChannelSink, ChatEvent, ClientFrame};
use tracing::debug;

use crate::api::{ApiError, ApiResult, AppState, SessionQuery};

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

// POST /api/chat
//
// Streaming (the default) answers with one JSON event per line: `{chunk}` lines, then a final
// `{response}` or `{error}` line. `stream: false` answers `{response}` once the turn is done.
pub async fn chat(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    Json(frame): Json<ClientFrame>,
) -> ApiResult<Response> {
    let message = frame
        .text()
        .ok_or_else(|| ApiError::bad_request("Message is required"))?
        .to_string();
    let session_id = query.id().to_string();

    if !frame.wants_stream() {
        let (sink, _events) = ChannelSink::channel(2);
        let reply = state
            .run_turn(&session_id, &message, Arc::new(sink), false)
            .await?;
        return Ok(Json(ChatEvent::response(reply)).into_response());
    }

    let (sink, events) = ChannelSink::channel(1);
    tokio::spawn(async move {
        if let Err(e) = state.run_turn(&session_id, &message, Arc::new(sink), true).await {
            debug!(error = %e, session_id = %session_id, "Streamed turn ended with error");
        }
    });

    // The body ends with the turn's final event.
    let lines = stream::unfold(Some(events), |events| async move {
        let mut events = events?;
        let event = events.recv().await?;
        let line = ndjson_line(&event);
        let next = (!event.is_terminal()).then_some(events);
        Some((Ok::<String, Infallible>(line), next))
    });

    Ok((
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(lines),
    )
        .into_response())
}

fn ndjson_line(event: &ChatEvent) -> String {
    let mut line = serde_json::to_string(event)
        .unwrap_or_else(|e| format!(r#"{{"error":"Failed to encode event: {}"}}"#, e));
    line.push('\n');
    line
}
