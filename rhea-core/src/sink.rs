//! Transport capability for delivering chat events.
//!
//! [`ChatSink`] is transport-agnostic; the runtime awaits each `send` before reading the next
//! fragment from the backend, so a sink sees events in order with at most one in flight.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::{Result, RheaError};
use crate::types::ChatEvent;

/// Delivers [`ChatEvent`]s to one client. Implementations map to a transport (WebSocket, HTTP body, terminal).
#[async_trait]
pub trait ChatSink: Send + Sync {
    /// Sends one event. An error means the client is gone.
    async fn send(&self, event: ChatEvent) -> Result<()>;
}

/// [`ChatSink`] over a bounded channel; the receiving side owns the actual transport.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    sender: mpsc::Sender<ChatEvent>,
}

impl ChannelSink {
    /// Creates a sink and its receiver. `capacity` is clamped to at least 1.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ChatEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl ChatSink for ChannelSink {
    async fn send(&self, event: ChatEvent) -> Result<()> {
        self.sender
            .send(event)
            .await
            .map_err(|_| RheaError::Transport("Client disconnected".to_string()))
    }
}
