//! Negotiation artifacts: JSEP description blobs and ICE candidates.
//!
//! An artifact is *opaque* to the session core: the state machine holds a
//! reference to it and passes it between the signaling channel and the
//! transport negotiation port, but never inspects the SDP itself. Artifacts
//! are shared by `Arc`, never copied: the same blob the port produced is the
//! blob that goes on the wire.

use serde::{Deserialize, Serialize};

/// Whether a JSEP blob is an offer or an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsepKind {
    Offer,
    Answer,
}

/// A JSEP session description as carried on the signaling channel.
///
/// # Serde representation
///
/// ```json
/// {"type":"offer","sdp":"v=0\r\n..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jsep {
    #[serde(rename = "type")]
    pub kind: JsepKind,
    pub sdp: String,
}

/// A single ICE candidate, trickled separately from the description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid", skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex", skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u32>,
}

/// A local or remote session description plus the candidates gathered for it.
///
/// Owned by the transport negotiation port; the state machine only ever
/// holds an `Arc` to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiationArtifact {
    pub jsep: Jsep,
    pub candidates: Vec<IceCandidate>,
}

impl NegotiationArtifact {
    pub fn new(kind: JsepKind, sdp: impl Into<String>) -> Self {
        Self {
            jsep: Jsep {
                kind,
                sdp: sdp.into(),
            },
            candidates: Vec::new(),
        }
    }

    pub fn kind(&self) -> JsepKind {
        self.jsep.kind
    }
}

/// Point-in-time transport statistics reported by a negotiation port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PortStats {
    /// Current receive bitrate in bits per second.
    pub bitrate_bps: u64,
    /// Negotiated video resolution, when video is flowing.
    pub resolution: Option<(u32, u32)>,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
