//! The session error taxonomy.
//!
//! Errors split into three recovery classes:
//!
//! - **Non-fatal diagnostics** – [`SessionError::OrphanMessage`] and an
//!   isolated [`SessionError::ProtocolDecodeError`] are logged by the router
//!   and swallowed; no session is mutated.
//! - **Synchronous command rejections** – state/argument validation errors
//!   returned directly to the caller without touching session state.
//! - **Session-fatal errors** – [`SessionError::AttachRejected`] and
//!   [`SessionError::NegotiationFailed`] move the session to `Failed`.
//!
//! The core never retries anything; retry policy belongs to the caller.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::session::SessionState;

/// Everything that can go wrong while driving a signaling session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// No transport negotiation port is configured, or the signaling
    /// channel has gone away.
    #[error("transport unavailable")]
    TransportUnavailable,

    /// The remote signaling layer rejected the application context.
    #[error("context attach rejected: {0}")]
    AttachRejected(String),

    /// A negotiation is already in flight for this session. New requests
    /// are rejected, never queued silently.
    #[error("negotiation already in progress")]
    NegotiationInProgress,

    /// The negotiation could not be completed: the port failed to produce
    /// an offer, or the remote artifact was malformed or rejected.
    #[error("negotiation failed: {0}")]
    NegotiationFailed(String),

    /// An inbound signaling frame could not be decoded.
    #[error("protocol decode error: {0}")]
    ProtocolDecodeError(String),

    /// An inbound frame referenced a session this router does not own.
    /// Non-fatal; recorded as a diagnostic and dropped.
    #[error("message for unknown session {0}")]
    OrphanMessage(Uuid),

    /// A command was dispatched in a state that does not permit it.
    #[error("command '{command}' is not valid in the {state} state")]
    InvalidStateForCommand {
        state: SessionState,
        command: &'static str,
    },

    /// A command argument was out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A data send was requested before the transport reported the data
    /// channel open.
    #[error("data channel not ready")]
    ChannelNotReady,
}
