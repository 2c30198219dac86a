//! # rtc-core
//!
//! Shared library for rtc-session containing the signaling wire protocol,
//! the session domain model, and the error taxonomy.
//!
//! This crate is used by every component that speaks the signaling protocol.
//! It has zero dependencies on sockets, timers, or any transport engine:
//! everything here is pure data and pure functions, which keeps it trivially
//! testable and reusable on both sides of the wire.
//!
//! # Architecture overview
//!
//! rtc-session is a client core for real-time peer sessions: it negotiates
//! and manages media/data sessions against a signaling server, while the
//! actual transport engine (ICE, DTLS/SRTP, congestion control) lives behind
//! an abstract port owned by the client crate.
//!
//! This crate (`rtc-core`) defines:
//!
//! - **`protocol`** – What travels over the signaling channel. Frames are
//!   JSON objects tagged by a `"type"` field, encoded and decoded through a
//!   single codec choke point, and correlated by transaction ids.
//!
//! - **`domain`** – Pure session vocabulary: lifecycle states, the typed
//!   events a session emits, the caller's declared media configuration
//!   ([`MediaIntent`]), negotiation artifacts (JSEP blobs plus ICE
//!   candidates), and capture/playback device descriptors.
//!
//! - **`error`** – The [`SessionError`] taxonomy shared by the state
//!   machine, router, and command dispatcher.

pub mod domain;
pub mod error;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `rtc_core::SessionEvent` instead of `rtc_core::domain::session::SessionEvent`.
pub use domain::artifact::{IceCandidate, Jsep, JsepKind, NegotiationArtifact, PortStats};
pub use domain::media::{Device, DeviceKind, MediaIntent, MediaKind};
pub use domain::session::{CommandHandle, SessionEvent, SessionState};
pub use error::SessionError;
pub use protocol::codec::{decode_frame, encode_frame, CodecError};
pub use protocol::frames::{ClientFrame, ConfigureBody, ServerFrame};
pub use protocol::transaction::TransactionCounter;
