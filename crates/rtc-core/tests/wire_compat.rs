//! Pins the exact JSON wire shape of the signaling protocol.
//!
//! These tests assert against literal JSON, not against a round trip, so a
//! field rename or a serde attribute change that would break deployed
//! servers shows up as a test failure rather than a silent wire change.

use rtc_core::domain::artifact::{IceCandidate, Jsep, JsepKind};
use rtc_core::protocol::codec::{decode_frame, encode_frame};
use rtc_core::protocol::frames::{error_codes, ClientFrame, ConfigureBody, ServerFrame};
use serde_json::{json, Value};
use uuid::Uuid;

const SID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn sid() -> Uuid {
    Uuid::parse_str(SID).unwrap()
}

fn encoded(frame: &ClientFrame) -> Value {
    serde_json::from_str(&encode_frame(frame).unwrap()).unwrap()
}

#[test]
fn create_frame_wire_shape() {
    let value = encoded(&ClientFrame::Create {
        session_id: sid(),
        transaction: 1,
    });
    assert_eq!(
        value,
        json!({"type": "create", "session_id": SID, "transaction": 1})
    );
}

#[test]
fn attach_frame_wire_shape() {
    let value = encoded(&ClientFrame::Attach {
        session_id: sid(),
        context_id: "echo".to_string(),
        transaction: 2,
    });
    assert_eq!(
        value,
        json!({"type": "attach", "session_id": SID, "context_id": "echo", "transaction": 2})
    );
}

#[test]
fn configure_frame_carries_body_and_jsep() {
    let value = encoded(&ClientFrame::Configure {
        session_id: sid(),
        transaction: 3,
        body: ConfigureBody {
            audio: Some(true),
            video: Some(true),
            bitrate: Some(128_000),
        },
        jsep: Some(Jsep {
            kind: JsepKind::Offer,
            sdp: "v=0\r\n".to_string(),
        }),
    });
    assert_eq!(
        value,
        json!({
            "type": "configure",
            "session_id": SID,
            "transaction": 3,
            "body": {"audio": true, "video": true, "bitrate": 128_000},
            "jsep": {"type": "offer", "sdp": "v=0\r\n"}
        })
    );
}

#[test]
fn configure_toggle_sends_only_the_toggled_field() {
    let value = encoded(&ClientFrame::Configure {
        session_id: sid(),
        transaction: 4,
        body: ConfigureBody {
            video: Some(false),
            ..ConfigureBody::default()
        },
        jsep: None,
    });
    assert_eq!(
        value,
        json!({
            "type": "configure",
            "session_id": SID,
            "transaction": 4,
            "body": {"video": false}
        })
    );
}

#[test]
fn trickle_frame_uses_webrtc_candidate_fields() {
    let value = encoded(&ClientFrame::Trickle {
        session_id: sid(),
        candidate: IceCandidate {
            candidate: "candidate:0 1 UDP 2122252543 192.0.2.1 54321 typ host".to_string(),
            sdp_mid: Some("0".to_string()),
            sdp_m_line_index: Some(0),
        },
    });
    assert_eq!(
        value,
        json!({
            "type": "trickle",
            "session_id": SID,
            "candidate": {
                "candidate": "candidate:0 1 UDP 2122252543 192.0.2.1 54321 typ host",
                "sdpMid": "0",
                "sdpMLineIndex": 0
            }
        })
    );
}

#[test]
fn keepalive_and_close_wire_shapes() {
    let keepalive = encoded(&ClientFrame::KeepAlive {
        session_id: sid(),
        transaction: 5,
    });
    assert_eq!(
        keepalive,
        json!({"type": "keepalive", "session_id": SID, "transaction": 5})
    );

    let close = encoded(&ClientFrame::Close {
        session_id: sid(),
        transaction: 6,
    });
    assert_eq!(
        close,
        json!({"type": "close", "session_id": SID, "transaction": 6})
    );
}

#[test]
fn data_frame_wire_shape() {
    let value = encoded(&ClientFrame::Data {
        session_id: sid(),
        transaction: 7,
        payload: "hello".to_string(),
    });
    assert_eq!(
        value,
        json!({"type": "data", "session_id": SID, "transaction": 7, "payload": "hello"})
    );
}

#[test]
fn server_ack_decodes_from_canonical_json() {
    let frame =
        decode_frame(&format!(r#"{{"type":"ack","session_id":"{SID}","transaction":7}}"#)).unwrap();
    assert_eq!(
        frame,
        ServerFrame::Ack {
            session_id: sid(),
            transaction: 7
        }
    );
}

#[test]
fn server_error_decodes_with_known_codes() {
    let frame = decode_frame(&format!(
        r#"{{"type":"error","session_id":"{SID}","code":457,"reason":"no such context","transaction":2}}"#
    ))
    .unwrap();
    assert_eq!(
        frame,
        ServerFrame::Error {
            session_id: Some(sid()),
            code: error_codes::CONTEXT_REJECTED,
            reason: "no such context".to_string(),
            transaction: Some(2),
        }
    );
}

#[test]
fn server_closed_decodes() {
    let frame = decode_frame(&format!(r#"{{"type":"closed","session_id":"{SID}"}}"#)).unwrap();
    assert_eq!(frame, ServerFrame::Closed { session_id: sid() });
}

#[test]
fn server_data_decodes() {
    let frame = decode_frame(&format!(
        r#"{{"type":"data","session_id":"{SID}","payload":"echo me"}}"#
    ))
    .unwrap();
    assert_eq!(
        frame,
        ServerFrame::Data {
            session_id: sid(),
            payload: "echo me".to_string()
        }
    );
}
