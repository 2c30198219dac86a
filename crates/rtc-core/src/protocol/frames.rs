//! Typed signaling frames for both directions of the channel.
//!
//! # JSON discriminant
//!
//! Every frame is a JSON object with a `"type"` field that identifies the
//! variant; all other fields are flattened into the same object:
//!
//! ```json
//! {"type":"configure","session_id":"…","transaction":3,"body":{"audio":true,"video":true},"jsep":{"type":"offer","sdp":"…"}}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles this automatically.
//!
//! # Why separate client→server and server→client frame types?
//!
//! The two directions carry different information: the client sends commands
//! (create, attach, configure, …) and the server sends outcomes (acks,
//! events, errors). Two distinct enums make it a compile-time error to send
//! a server-only frame from the client, and vice versa.
//!
//! # Transactions
//!
//! Client frames that expect an acknowledgment carry a `transaction` id.
//! The server echoes it back in the matching `ack` or `error` frame, which
//! is how commands are correlated with their outcomes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::artifact::{IceCandidate, Jsep};

/// Numeric error codes carried by [`ServerFrame::Error`].
pub mod error_codes {
    /// The requested application context does not exist or refused the
    /// attach.
    pub const CONTEXT_REJECTED: u16 = 457;
    /// The frame referenced a session the server does not know.
    pub const SESSION_NOT_FOUND: u16 = 458;
    /// The request was syntactically valid but not applicable.
    pub const INVALID_REQUEST: u16 = 456;
    /// The server could not process the offer or answer.
    pub const NEGOTIATION_ERROR: u16 = 470;
}

// ── Client → Server frames ────────────────────────────────────────────────────

/// The `configure` request body: which media to (de)activate and an optional
/// bitrate cap.
///
/// Absent fields mean "leave as is", so a toggle sends only the field being
/// toggled. A `bitrate` of `0` removes any existing cap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<u64>,
}

/// All frames the client can send to the signaling server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// Register a new session with the server. Must be the first frame for
    /// a session id.
    Create { session_id: Uuid, transaction: u64 },

    /// Attach an application context (the server-side handler this session
    /// talks to) to the session.
    Attach {
        session_id: Uuid,
        context_id: String,
        transaction: u64,
    },

    /// Request a media configuration, optionally alongside a local offer.
    ///
    /// Sent with a `jsep` to start a negotiation; sent with only a `body`
    /// to toggle media or adjust the bitrate cap mid-session.
    Configure {
        session_id: Uuid,
        transaction: u64,
        body: ConfigureBody,
        #[serde(skip_serializing_if = "Option::is_none")]
        jsep: Option<Jsep>,
    },

    /// Send a payload over the session's data channel.
    Data {
        session_id: Uuid,
        transaction: u64,
        payload: String,
    },

    /// Relay one ICE candidate gathered after the offer was sent.
    Trickle {
        session_id: Uuid,
        candidate: IceCandidate,
    },

    /// Keep the server-side session alive. Sessions expire without these.
    #[serde(rename = "keepalive")]
    KeepAlive { session_id: Uuid, transaction: u64 },

    /// Tear the session down.
    Close { session_id: Uuid, transaction: u64 },
}

impl ClientFrame {
    /// The session this frame belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            ClientFrame::Create { session_id, .. }
            | ClientFrame::Attach { session_id, .. }
            | ClientFrame::Configure { session_id, .. }
            | ClientFrame::Data { session_id, .. }
            | ClientFrame::Trickle { session_id, .. }
            | ClientFrame::KeepAlive { session_id, .. }
            | ClientFrame::Close { session_id, .. } => *session_id,
        }
    }

    /// Frame type name for logging. Never includes payload contents, so
    /// data payloads and SDP blobs stay out of the logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            ClientFrame::Create { .. } => "create",
            ClientFrame::Attach { .. } => "attach",
            ClientFrame::Configure { .. } => "configure",
            ClientFrame::Data { .. } => "data",
            ClientFrame::Trickle { .. } => "trickle",
            ClientFrame::KeepAlive { .. } => "keepalive",
            ClientFrame::Close { .. } => "close",
        }
    }
}

// ── Server → Client frames ────────────────────────────────────────────────────

/// All frames the signaling server can send to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerFrame {
    /// The server accepted the request carrying this transaction id.
    Ack { session_id: Uuid, transaction: u64 },

    /// An asynchronous event from the attached context: a plugin-specific
    /// body, a remote description, or both.
    Event {
        session_id: Uuid,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        body: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        jsep: Option<Jsep>,
    },

    /// A payload arrived on the session's data channel.
    Data { session_id: Uuid, payload: String },

    /// The server rejected a request or hit a session-level error.
    ///
    /// `session_id` is absent for errors raised before a session existed;
    /// `transaction` is present when the error answers a specific request.
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        session_id: Option<Uuid>,
        code: u16,
        reason: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        transaction: Option<u64>,
    },

    /// The server tore the session down (in response to a `close` frame or
    /// on its own initiative).
    Closed { session_id: Uuid },
}

impl ServerFrame {
    /// The session this frame targets, when it targets one.
    pub fn session_id(&self) -> Option<Uuid> {
        match self {
            ServerFrame::Ack { session_id, .. }
            | ServerFrame::Event { session_id, .. }
            | ServerFrame::Data { session_id, .. }
            | ServerFrame::Closed { session_id } => Some(*session_id),
            ServerFrame::Error { session_id, .. } => *session_id,
        }
    }

    /// Frame type name for logging, payload-free.
    pub fn type_name(&self) -> &'static str {
        match self {
            ServerFrame::Ack { .. } => "ack",
            ServerFrame::Event { .. } => "event",
            ServerFrame::Data { .. } => "data",
            ServerFrame::Error { .. } => "error",
            ServerFrame::Closed { .. } => "closed",
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
