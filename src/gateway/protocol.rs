//! Wire protocol for the gateway WebSocket.
//!
//! Frames are JSON objects sent as WebSocket text messages. Every frame
//! carries a `type` field; all server frames put their data under a
//! `payload` object, while the client `auth` frame keeps its fields at the
//! top level (the gateway expects it as the very first message on the
//! socket, before anything else).
//!
//! The gateway is treated as an opaque relay: the client knows nothing
//! about the model or tools behind it beyond what these frames say.
//!
//! ## Forward compatibility
//!
//! A frame with an unrecognized `type` parses into [`ServerEvent::Unknown`]
//! and is non-fatal. A frame that is not valid JSON, or whose payload is
//! missing a required field, is a [`ProtocolError`]; the caller reports it
//! and treats it as the end of the current turn so the UI never wedges.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Well-known WebSocket endpoint path on the gateway host.
pub const ENDPOINT_PATH: &str = "/ws";

/// Frames sent from the client to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Login credentials. Must be the first frame on a fresh connection.
    Auth { email: String, password: String },
    /// A chat message for the agent.
    Message { payload: ChatPayload },
}

/// Payload of a [`ClientFrame::Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPayload {
    pub text: String,
}

impl ClientFrame {
    pub fn auth(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Auth {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn chat(text: impl Into<String>) -> Self {
        Self::Message {
            payload: ChatPayload { text: text.into() },
        }
    }

    /// Serialize to the JSON text that goes on the wire.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Json)
    }
}

/// Frames received from the gateway, decoded into typed events.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// A fragment of streamed assistant text. Fragments within one turn are
    /// concatenated in arrival order.
    Text { content: String },
    /// Progress line from the backend, optionally naming the tool in use.
    Status { message: String, tool: Option<String> },
    /// Application-level error from the backend. Ends the turn.
    Error { message: String },
    /// Login accepted; carries the server-assigned session id.
    AuthSuccess { session_id: String },
    /// Login rejected; retrying is allowed.
    AuthFailed { message: String },
    /// End of the assistant turn.
    End,
    /// Legacy connection notice, superseded by `auth_success`.
    Connection { session_id: String },
    /// Unrecognized frame type, kept verbatim for display.
    Unknown { kind: String, raw: String },
}

/// Failures decoding an inbound frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("invalid frame JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{kind}` frame has a malformed payload: {source}")]
    Payload {
        kind: String,
        source: serde_json::Error,
    },
}

#[derive(Deserialize)]
struct RawFrame {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

fn payload<T: DeserializeOwned>(kind: &str, value: serde_json::Value) -> Result<T, ProtocolError> {
    serde_json::from_value(value).map_err(|source| ProtocolError::Payload {
        kind: kind.to_string(),
        source,
    })
}

/// Decode one inbound text frame.
pub fn parse_server_frame(raw: &str) -> Result<ServerEvent, ProtocolError> {
    let frame: RawFrame = serde_json::from_str(raw)?;

    #[derive(Deserialize)]
    struct TextPayload {
        content: String,
    }
    #[derive(Deserialize)]
    struct StatusPayload {
        message: String,
        #[serde(default)]
        tool: Option<String>,
    }
    #[derive(Deserialize)]
    struct MessagePayload {
        message: String,
    }
    #[derive(Deserialize)]
    struct SessionPayload {
        #[serde(rename = "sessionId")]
        session_id: String,
    }

    let event = match frame.kind.as_str() {
        "text" => {
            let p: TextPayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::Text { content: p.content }
        }
        "status" => {
            let p: StatusPayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::Status {
                message: p.message,
                tool: p.tool,
            }
        }
        "error" => {
            let p: MessagePayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::Error { message: p.message }
        }
        "auth_success" => {
            let p: SessionPayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::AuthSuccess {
                session_id: p.session_id,
            }
        }
        "auth_failed" => {
            let p: MessagePayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::AuthFailed { message: p.message }
        }
        "end" => ServerEvent::End,
        "connection" => {
            let p: SessionPayload = payload(&frame.kind, frame.payload)?;
            ServerEvent::Connection {
                session_id: p.session_id,
            }
        }
        _ => ServerEvent::Unknown {
            kind: frame.kind,
            raw: raw.to_string(),
        },
    };

    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_frame_wire_shape() {
        let frame = ClientFrame::auth("a@b.com", "hunter two");
        let json = frame.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "auth");
        assert_eq!(value["email"], "a@b.com");
        assert_eq!(value["password"], "hunter two");
        assert!(value.get("payload").is_none());
    }

    #[test]
    fn chat_frame_wire_shape() {
        let frame = ClientFrame::chat("hello");
        let json = frame.encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "message");
        assert_eq!(value["payload"]["text"], "hello");
    }

    #[test]
    fn parse_text_frame() {
        let event = parse_server_frame(r#"{"type":"text","payload":{"content":"Hi"}}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Text {
                content: "Hi".into()
            }
        );
    }

    #[test]
    fn parse_status_frame_with_and_without_tool() {
        let event = parse_server_frame(
            r#"{"type":"status","payload":{"message":"Searching…","tool":"memory"}}"#,
        )
        .unwrap();
        assert_eq!(
            event,
            ServerEvent::Status {
                message: "Searching…".into(),
                tool: Some("memory".into()),
            }
        );

        let event =
            parse_server_frame(r#"{"type":"status","payload":{"message":"Thinking"}}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Status {
                message: "Thinking".into(),
                tool: None,
            }
        );
    }

    #[test]
    fn parse_auth_frames() {
        let event =
            parse_server_frame(r#"{"type":"auth_success","payload":{"sessionId":"abc"}}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::AuthSuccess {
                session_id: "abc".into()
            }
        );

        let event =
            parse_server_frame(r#"{"type":"auth_failed","payload":{"message":"bad creds"}}"#)
                .unwrap();
        assert_eq!(
            event,
            ServerEvent::AuthFailed {
                message: "bad creds".into()
            }
        );
    }

    #[test]
    fn parse_end_tolerates_empty_and_missing_payload() {
        assert_eq!(
            parse_server_frame(r#"{"type":"end","payload":{}}"#).unwrap(),
            ServerEvent::End
        );
        assert_eq!(parse_server_frame(r#"{"type":"end"}"#).unwrap(), ServerEvent::End);
    }

    #[test]
    fn parse_legacy_connection_frame() {
        let event =
            parse_server_frame(r#"{"type":"connection","payload":{"sessionId":"xyz"}}"#).unwrap();
        assert_eq!(
            event,
            ServerEvent::Connection {
                session_id: "xyz".into()
            }
        );
    }

    #[test]
    fn unknown_type_is_preserved_verbatim() {
        let raw = r#"{"type":"telemetry","payload":{"n":1}}"#;
        match parse_server_frame(raw).unwrap() {
            ServerEvent::Unknown { kind, raw: kept } => {
                assert_eq!(kind, "telemetry");
                assert_eq!(kept, raw);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_server_frame("not json"),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn known_type_with_bad_payload_is_an_error() {
        let err = parse_server_frame(r#"{"type":"text","payload":{"content":42}}"#).unwrap_err();
        match err {
            ProtocolError::Payload { kind, .. } => assert_eq!(kind, "text"),
            other => panic!("expected Payload error, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_field_is_an_error() {
        assert!(matches!(
            parse_server_frame(r#"{"type":"auth_success","payload":{}}"#),
            Err(ProtocolError::Payload { .. })
        ));
    }
}
