//! WebSocket chat: `GET /ws?session=<id>`.
//!
//! Client frames are `{message}` or `{toggle_fast_mode}`; every server frame is one [`ChatEvent`].
//! A single writer task owns the socket's send half; turns run one at a time in the reader loop.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use rhea_core::{ChannelSink, ChatEvent, ChatSink, ClientFrame};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::api::{AppState, SessionQuery};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> impl IntoResponse {
    let named = query
        .session
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let ephemeral = named.is_none();
    let session_id = named.unwrap_or_else(|| Uuid::new_v4().to_string());

    ws.on_upgrade(move |socket| async move {
        info!(session_id = %session_id, "WebSocket connected");
        if let Err(err) = handle_socket(socket, state.clone(), &session_id).await {
            warn!(session_id = %session_id, "WebSocket error: {}", err);
        }
        if ephemeral {
            state.end_session(&session_id).await;
        }
        info!(session_id = %session_id, "WebSocket closed");
    })
}

async fn handle_socket(socket: WebSocket, state: AppState, session_id: &str) -> anyhow::Result<()> {
    let (mut sender, mut receiver) = socket.split();
    let (sink, mut events) = ChannelSink::channel(1);
    let sink: Arc<dyn ChatSink> = Arc::new(sink);

    let writer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = serde_json::to_string(&event)?;
            sender.send(Message::Text(text.into())).await?;
        }
        Ok::<(), anyhow::Error>(())
    });

    sink.send(state.greeting(session_id).await).await?;

    while let Some(msg) = receiver.next().await {
        let text = match msg? {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let frame: ClientFrame = match serde_json::from_str(text.as_str()) {
            Ok(frame) => frame,
            Err(e) => {
                sink.send(ChatEvent::error(format!("Invalid message: {}", e)))
                    .await?;
                continue;
            }
        };

        if let Some(enabled) = frame.toggle_fast_mode {
            sink.send(state.set_fast_mode(session_id, enabled).await)
                .await?;
            continue;
        }

        let Some(message) = frame.text() else {
            sink.send(ChatEvent::error("Message is required")).await?;
            continue;
        };

        if let Err(e) = state
            .run_turn(session_id, message, sink.clone(), frame.wants_stream())
            .await
        {
            // Already delivered to the client as an error event.
            debug!(error = %e, "Turn failed");
        }
    }

    drop(sink);
    writer.await??;
    Ok(())
}
