//! Encode/decode choke point between raw signaling text and typed frames.
//!
//! All traffic goes through these two functions so the rest of the client
//! never touches serde_json directly and decode failures surface in exactly
//! one place. One JSON object per text frame; nothing is framed or batched
//! at this layer.

use thiserror::Error;

use crate::protocol::frames::{ClientFrame, ServerFrame};

/// Errors from frame encoding or decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text was not valid JSON, or was missing/mistyping fields the
    /// frame requires.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Encodes a [`ClientFrame`] into the JSON text to put on the wire.
///
/// # Errors
///
/// Returns [`CodecError`] if serialization fails. With these frame types
/// that only happens on pathological payloads (non-string JSON map keys and
/// the like), but callers still propagate it rather than panic.
pub fn encode_frame(frame: &ClientFrame) -> Result<String, CodecError> {
    Ok(serde_json::to_string(frame)?)
}

/// Decodes one [`ServerFrame`] from a raw text frame.
///
/// # Errors
///
/// Returns [`CodecError`] when `raw` is not a well-formed frame. Decode
/// errors are non-fatal to sessions: the router logs them and carries on.
pub fn decode_frame(raw: &str) -> Result<ServerFrame, CodecError> {
    Ok(serde_json::from_str(raw)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::JsepKind;
    use uuid::Uuid;

    fn sid() -> Uuid {
        Uuid::parse_str("9f1c5f6a-3b1f-4e7a-a9be-07d3a1e0c001").unwrap()
    }

    #[test]
    fn test_decode_ack_frame() {
        let raw = format!(
            r#"{{"type":"ack","session_id":"{}","transaction":12}}"#,
            sid()
        );
        let frame = decode_frame(&raw).unwrap();
        assert!(matches!(frame, ServerFrame::Ack { transaction: 12, .. }));
    }

    #[test]
    fn test_decode_event_with_remote_answer() {
        let raw = format!(
            r#"{{"type":"event","session_id":"{}","jsep":{{"type":"answer","sdp":"v=0\r\n"}}}}"#,
            sid()
        );
        let frame = decode_frame(&raw).unwrap();
        match frame {
            ServerFrame::Event { jsep: Some(jsep), .. } => {
                assert_eq!(jsep.kind, JsepKind::Answer)
            }
            other => panic!("expected Event with jsep, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage_returns_malformed() {
        let result = decode_frame("not json at all");
        assert!(matches!(result, Err(CodecError::Malformed(_))));
    }

    #[test]
    fn test_decode_wrong_field_type_returns_malformed() {
        // transaction must be a number
        let raw = format!(
            r#"{{"type":"ack","session_id":"{}","transaction":"twelve"}}"#,
            sid()
        );
        assert!(decode_frame(&raw).is_err());
    }

    #[test]
    fn test_encoded_frame_decodes_as_the_same_json_object() {
        let frame = ClientFrame::KeepAlive {
            session_id: sid(),
            transaction: 3,
        };
        let raw = encode_frame(&frame).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["type"], "keepalive");
        assert_eq!(value["session_id"], sid().to_string());
        assert_eq!(value["transaction"], 3);
    }
}
