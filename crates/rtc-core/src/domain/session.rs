//! Session lifecycle states, the typed events a session emits, and command
//! correlation handles.
//!
//! # Lifecycle
//!
//! ```text
//! Idle → Connecting → Attached → Negotiating → Active → Closing → Closed
//!                                     ↑            |
//!                                     └────────────┘  (renegotiation)
//! ```
//!
//! `Failed` is terminal and reachable from any live state. `Active` loops
//! back through `Negotiating` when the caller changes its media intent.
//!
//! # Event delivery
//!
//! Every state transition emits exactly one typed [`SessionEvent`], in
//! transition order, over the channel handed out at session construction.
//! Events that are not transitions (data arrival, command acknowledgments,
//! the data channel opening) share the same channel so a subscriber sees a
//! single ordered stream.

use uuid::Uuid;

use crate::error::SessionError;

/// Lifecycle state of one signaling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no contact with the signaling server yet.
    Idle,
    /// Session creation sent to the server.
    Connecting,
    /// An application context is attached; ready to negotiate.
    Attached,
    /// An offer is in flight. At most one negotiation per session.
    Negotiating,
    /// Media and/or data are flowing.
    Active,
    /// Teardown in progress.
    Closing,
    /// Torn down. Terminal.
    Closed,
    /// Unrecoverable error. Terminal.
    Failed,
}

impl SessionState {
    /// True once the session can no longer transition anywhere.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Attached => "attached",
            SessionState::Negotiating => "negotiating",
            SessionState::Active => "active",
            SessionState::Closing => "closing",
            SessionState::Closed => "closed",
            SessionState::Failed => "failed",
        };
        write!(f, "{name}")
    }
}

/// Correlates a dispatched command with its eventual acknowledgment.
///
/// Wraps the transaction id the command was sent with. The server echoes the
/// id back in its `ack`/`error` frame, which the session surfaces as a
/// [`SessionEvent::CommandAcked`] or [`SessionEvent::CommandFailed`]
/// carrying the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandHandle(pub u64);

/// Typed events surfaced to the session's subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session reached the signaling server (entered `Connecting`).
    Connected { session_id: Uuid },
    /// An application context was attached.
    Attached { session_id: Uuid, context_id: String },
    /// An offer was produced and sent; negotiation is in flight.
    Negotiated { session_id: Uuid },
    /// The remote description was applied; media is flowing.
    MediaActive {
        session_id: Uuid,
        audio: bool,
        video: bool,
    },
    /// The transport reported the data channel open. At most once per
    /// session.
    DataChannelOpen { session_id: Uuid },
    /// A data channel payload arrived.
    DataReceived { session_id: Uuid, payload: String },
    /// The server acknowledged a dispatched command.
    CommandAcked {
        session_id: Uuid,
        handle: CommandHandle,
    },
    /// The server rejected a dispatched command.
    CommandFailed {
        session_id: Uuid,
        handle: CommandHandle,
        code: u16,
        reason: String,
    },
    /// The session is torn down. Emitted exactly once per session.
    Closed { session_id: Uuid },
    /// The session failed terminally.
    Failed {
        session_id: Uuid,
        error: SessionError,
    },
}

impl SessionEvent {
    /// The session this event belongs to.
    pub fn session_id(&self) -> Uuid {
        match self {
            SessionEvent::Connected { session_id }
            | SessionEvent::Attached { session_id, .. }
            | SessionEvent::Negotiated { session_id }
            | SessionEvent::MediaActive { session_id, .. }
            | SessionEvent::DataChannelOpen { session_id }
            | SessionEvent::DataReceived { session_id, .. }
            | SessionEvent::CommandAcked { session_id, .. }
            | SessionEvent::CommandFailed { session_id, .. }
            | SessionEvent::Closed { session_id }
            | SessionEvent::Failed { session_id, .. } => *session_id,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
