//! Unit tests for line framing and message classification.
//!
//! These tests verify how raw input lines map onto frames, and that the
//! writer produces exactly one flushed JSON document per line.

use mock_acp_agent::framing::{decode_line, Frame, LineReader, LineWriter};
use mock_acp_agent::protocol::{
    IncomingMessage, JsonRpcError, JsonRpcNotification, JsonRpcResponse,
};
use serde_json::json;

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn test_decode_request() {
    let frame = decode_line(br#"{"jsonrpc":"2.0","id":3,"method":"session/new","params":{}}"#);

    assert_eq!(
        frame,
        Frame::Message(IncomingMessage::Request {
            id: json!(3),
            method: "session/new".to_string(),
            params: json!({}),
        })
    );
}

#[test]
fn test_decode_notification() {
    let frame = decode_line(br#"{"jsonrpc":"2.0","method":"session/cancel"}"#);

    match frame {
        Frame::Message(message) => {
            assert!(message.is_notification());
            assert_eq!(message.method(), Some("session/cancel"));
        }
        other => panic!("expected notification, got {other:?}"),
    }
}

#[test]
fn test_decode_tolerates_surrounding_whitespace() {
    let frame = decode_line(b"   {\"id\":1,\"method\":\"shutdown\"}   \n");
    assert!(matches!(frame, Frame::Message(_)));
}

#[test]
fn test_decode_malformed_inputs() {
    let lines: [&[u8]; 5] = [
        b"hello",
        b"{\"id\":1,",
        b"null",
        b"42",
        b"{\"jsonrpc\":\"2.0\"}",
    ];
    for line in lines {
        assert!(
            matches!(decode_line(line), Frame::Malformed(_)),
            "expected malformed for {:?}",
            String::from_utf8_lossy(line)
        );
    }
}

// ============================================================================
// Reading and writing
// ============================================================================

#[tokio::test]
async fn test_reader_sequence() {
    let input: &[u8] = b"{\"id\":1,\"method\":\"a\"}\n\nbad\n{\"method\":\"b\"}\n";
    let mut reader = LineReader::new(input);

    let mut frames = Vec::new();
    while let Some(frame) = reader.next_frame().await.unwrap() {
        frames.push(frame);
    }

    assert_eq!(frames.len(), 4);
    assert!(matches!(frames[0], Frame::Message(IncomingMessage::Request { .. })));
    assert_eq!(frames[1], Frame::Blank);
    assert!(matches!(frames[2], Frame::Malformed(_)));
    assert!(matches!(frames[3], Frame::Message(IncomingMessage::Notification { .. })));
}

#[tokio::test]
async fn test_writer_round_trips_envelopes() {
    let mut writer = LineWriter::new(Vec::new());
    writer
        .send(
            "notification",
            &JsonRpcNotification::new("session/update", Some(json!({"sessionId": "s"}))),
        )
        .await
        .unwrap();
    writer
        .send(
            "response",
            &JsonRpcResponse::new_error(json!(1), JsonRpcError::method_not_found("x")),
        )
        .await
        .unwrap();

    let out = String::from_utf8(writer.into_inner()).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(out.ends_with('\n'));

    let notification: JsonRpcNotification = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(notification.method(), "session/update");
    assert_eq!(notification.params(), Some(&json!({"sessionId": "s"})));

    let response: JsonRpcResponse = serde_json::from_str(lines[1]).unwrap();
    assert!(response.is_error());
    assert!(!response.is_success());
    assert_eq!(response.error().map(JsonRpcError::code), Some(-32601));
}
