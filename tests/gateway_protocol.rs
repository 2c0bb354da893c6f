//! Gateway protocol tests.
//!
//! These verify the JSON frame contract both as raw shapes and through the
//! typed encoder/decoder.

use serde_json::json;

use wireline::gateway::{ClientFrame, ProtocolError, ServerEvent, parse_server_frame};

/// The client→server frame shapes the gateway expects.
mod client_frames {
    use super::*;

    #[test]
    fn auth_message_structure() {
        let msg = json!({
            "type": "auth",
            "email": "tony@example.com",
            "password": "secret"
        });

        assert_eq!(msg["type"], "auth");
        assert!(msg["email"].is_string());
        assert!(msg["password"].is_string());
    }

    #[test]
    fn chat_message_structure() {
        let msg = json!({
            "type": "message",
            "payload": { "text": "Hello, world!" }
        });

        assert_eq!(msg["type"], "message");
        assert!(msg["payload"]["text"].is_string());
    }

    #[test]
    fn encoder_produces_the_documented_auth_shape() {
        let encoded = ClientFrame::auth("tony@example.com", "secret")
            .encode()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "auth",
                "email": "tony@example.com",
                "password": "secret"
            })
        );
    }

    #[test]
    fn encoder_produces_the_documented_chat_shape() {
        let encoded = ClientFrame::chat("Hello, world!").encode().unwrap();
        let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "message",
                "payload": { "text": "Hello, world!" }
            })
        );
    }
}

/// The server→client frame shapes and their typed decoding.
mod server_frames {
    use super::*;

    #[test]
    fn auth_success_carries_session_id() {
        let raw = json!({
            "type": "auth_success",
            "payload": { "sessionId": "sess-123" }
        })
        .to_string();

        assert_eq!(
            parse_server_frame(&raw).unwrap(),
            ServerEvent::AuthSuccess {
                session_id: "sess-123".into()
            }
        );
    }

    #[test]
    fn auth_failed_carries_the_reason() {
        let raw = json!({
            "type": "auth_failed",
            "payload": { "message": "Incorrect password" }
        })
        .to_string();

        assert_eq!(
            parse_server_frame(&raw).unwrap(),
            ServerEvent::AuthFailed {
                message: "Incorrect password".into()
            }
        );
    }

    #[test]
    fn text_frames_decode_in_order() {
        let fragments = ["Hi", " there"];
        let decoded: Vec<ServerEvent> = fragments
            .iter()
            .map(|content| {
                let raw = json!({
                    "type": "text",
                    "payload": { "content": content }
                })
                .to_string();
                parse_server_frame(&raw).unwrap()
            })
            .collect();

        assert_eq!(
            decoded,
            vec![
                ServerEvent::Text {
                    content: "Hi".into()
                },
                ServerEvent::Text {
                    content: " there".into()
                },
            ]
        );
    }

    #[test]
    fn status_tool_field_is_optional() {
        let with_tool = json!({
            "type": "status",
            "payload": { "message": "Querying memory graph", "tool": "memory_search" }
        })
        .to_string();
        assert_eq!(
            parse_server_frame(&with_tool).unwrap(),
            ServerEvent::Status {
                message: "Querying memory graph".into(),
                tool: Some("memory_search".into()),
            }
        );

        let without_tool = json!({
            "type": "status",
            "payload": { "message": "Thinking" }
        })
        .to_string();
        assert_eq!(
            parse_server_frame(&without_tool).unwrap(),
            ServerEvent::Status {
                message: "Thinking".into(),
                tool: None,
            }
        );
    }

    #[test]
    fn end_frame_has_an_empty_payload() {
        let raw = json!({ "type": "end", "payload": {} }).to_string();
        assert_eq!(parse_server_frame(&raw).unwrap(), ServerEvent::End);
    }

    #[test]
    fn legacy_connection_frame_still_decodes() {
        let raw = json!({
            "type": "connection",
            "payload": { "sessionId": "legacy-1" }
        })
        .to_string();
        assert_eq!(
            parse_server_frame(&raw).unwrap(),
            ServerEvent::Connection {
                session_id: "legacy-1".into()
            }
        );
    }
}

/// Tolerance for frames we did not anticipate.
mod unknown_and_malformed {
    use super::*;

    #[test]
    fn future_frame_types_are_not_an_error() {
        let raw = json!({
            "type": "usage_report",
            "payload": { "tokens": 512 }
        })
        .to_string();

        match parse_server_frame(&raw).unwrap() {
            ServerEvent::Unknown { kind, raw: kept } => {
                assert_eq!(kind, "usage_report");
                assert_eq!(kept, raw);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn truncated_json_is_a_protocol_error() {
        assert!(matches!(
            parse_server_frame(r#"{"type":"text","payload":{"content":"Hi"#),
            Err(ProtocolError::Json(_))
        ));
    }

    #[test]
    fn known_type_with_wrong_payload_shape_is_a_protocol_error() {
        let raw = json!({
            "type": "auth_success",
            "payload": { "session": "wrong-key" }
        })
        .to_string();

        assert!(matches!(
            parse_server_frame(&raw),
            Err(ProtocolError::Payload { .. })
        ));
    }

    #[test]
    fn a_frame_without_a_type_is_a_protocol_error() {
        let raw = json!({ "payload": { "content": "Hi" } }).to_string();
        assert!(parse_server_frame(&raw).is_err());
    }
}
