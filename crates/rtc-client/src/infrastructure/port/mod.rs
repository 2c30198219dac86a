//! The transport negotiation port: the seam between the session core and
//! whatever real-time engine actually moves media.
//!
//! The core never implements ICE, DTLS/SRTP, or congestion control. It asks
//! a [`NegotiationPort`] for an offer, hands it the remote description, and
//! reads stats, nothing more. Each port instance is exclusively owned by
//! one session for that session's lifetime; a renegotiation reuses the same
//! instance, and `close()` drops it.
//!
//! [`LoopbackPort`] is the in-process implementation used by the demo
//! binary and the integration tests. Production deployments implement this
//! trait over their engine of choice.

mod loopback;

pub use loopback::LoopbackPort;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use rtc_core::domain::artifact::{NegotiationArtifact, PortStats};
use rtc_core::domain::media::MediaIntent;

/// Errors a negotiation port can report.
///
/// The session maps all of these onto its own taxonomy: a failure here
/// fails the in-flight negotiation, never the whole process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortError {
    /// The engine could not build a local offer for the requested intent.
    #[error("offer creation failed: {0}")]
    OfferFailed(String),

    /// The engine rejected the remote description.
    #[error("remote description rejected: {0}")]
    RemoteRejected(String),

    /// The engine is gone (device unplugged, process died, timeout).
    #[error("transport engine unavailable: {0}")]
    Unavailable(String),
}

/// Abstract capability the session core consumes to negotiate a peer
/// connection.
///
/// Implementations may impose their own timeouts internally; a timeout is
/// reported as an error from the pending call, which the session surfaces
/// as a failed negotiation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NegotiationPort: Send {
    /// Builds a local offer for the given media intent.
    ///
    /// The returned artifact is owned by the port and shared by `Arc`; the
    /// session forwards the same blob to the signaling channel without
    /// copying or inspecting it.
    async fn create_offer(
        &mut self,
        intent: MediaIntent,
    ) -> Result<Arc<NegotiationArtifact>, PortError>;

    /// Applies the remote description that answers (or renegotiates) the
    /// current offer.
    async fn apply_remote(&mut self, artifact: Arc<NegotiationArtifact>) -> Result<(), PortError>;

    /// Whether the engine has reported the data channel open.
    fn data_channel_open(&self) -> bool;

    /// Point-in-time transport statistics.
    async fn stats(&self) -> PortStats;
}
