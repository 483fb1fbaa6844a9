//! Wire payloads exchanged with chat clients.

use serde::{Deserialize, Serialize};

/// Session used when a client does not name one.
pub const DEFAULT_SESSION_ID: &str = "default";

/// One event sent to a chat client. Serializes to a single-key object:
/// `{"chunk": ..}`, `{"response": ..}`, `{"error": ..}` or `{"system": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatEvent {
    /// One streamed fragment of the assistant reply.
    Chunk {
        chunk: String,
        /// Display name of the speaking persona.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        character: Option<String>,
    },
    /// The complete assistant reply; ends a successful turn.
    Response { response: String },
    /// A failed turn or rejected request.
    Error { error: String },
    /// Informational notice (greeting, mode toggles).
    System { system: String },
}

impl ChatEvent {
    pub fn chunk(chunk: impl Into<String>, character: Option<String>) -> Self {
        ChatEvent::Chunk {
            chunk: chunk.into(),
            character,
        }
    }

    pub fn response(response: impl Into<String>) -> Self {
        ChatEvent::Response {
            response: response.into(),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        ChatEvent::Error {
            error: error.into(),
        }
    }

    pub fn system(system: impl Into<String>) -> Self {
        ChatEvent::System {
            system: system.into(),
        }
    }

    /// True for events that end a turn.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ChatEvent::Response { .. } | ChatEvent::Error { .. })
    }
}

/// A message from a chat client: `{message, stream?, toggle_fast_mode?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFrame {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toggle_fast_mode: Option<bool>,
}

impl ClientFrame {
    /// Message text as sent; `None` when blank.
    pub fn text(&self) -> Option<&str> {
        (!self.message.trim().is_empty()).then_some(self.message.as_str())
    }

    /// Streaming is the default.
    pub fn wants_stream(&self) -> bool {
        self.stream.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shapes() {
        let chunk = ChatEvent::chunk("Hel", Some("Rhea".to_string()));
        assert_eq!(
            serde_json::to_string(&chunk).unwrap(),
            r#"{"chunk":"Hel","character":"Rhea"}"#
        );
        assert_eq!(
            serde_json::to_string(&ChatEvent::chunk("lo", None)).unwrap(),
            r#"{"chunk":"lo"}"#
        );
        assert_eq!(
            serde_json::to_string(&ChatEvent::response("Hello")).unwrap(),
            r#"{"response":"Hello"}"#
        );
        assert_eq!(
            serde_json::to_string(&ChatEvent::error("boom")).unwrap(),
            r#"{"error":"boom"}"#
        );
        assert_eq!(
            serde_json::to_string(&ChatEvent::system("hi")).unwrap(),
            r#"{"system":"hi"}"#
        );
    }

    #[test]
    fn test_event_round_trip_from_wire() {
        let event: ChatEvent = serde_json::from_str(r#"{"error":"boom"}"#).unwrap();
        assert_eq!(event, ChatEvent::error("boom"));
        assert!(event.is_terminal());
        assert!(!ChatEvent::chunk("x", None).is_terminal());
    }

    #[test]
    fn test_client_frame_defaults() {
        let frame: ClientFrame = serde_json::from_str(r#"{"message":"  hi\n"}"#).unwrap();
        assert_eq!(frame.text(), Some("  hi\n"));

        let frame: ClientFrame = serde_json::from_str(r#"{"message":" \n "}"#).unwrap();
        assert_eq!(frame.text(), None);
        assert!(frame.wants_stream());

        let frame: ClientFrame = serde_json::from_str(r#"{"toggle_fast_mode":true}"#).unwrap();
        assert_eq!(frame.text(), None);
        assert_eq!(frame.toggle_fast_mode, Some(true));

        let frame: ClientFrame = serde_json::from_str(r#"{"message":"x","stream":false}"#).unwrap();
        assert!(!frame.wants_stream());
    }
}
