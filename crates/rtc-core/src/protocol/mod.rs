//! The signaling wire protocol.
//!
//! Frames are JSON text messages, one frame per WebSocket text message,
//! discriminated by a `"type"` field. [`frames`] defines the typed enums for
//! each direction, [`codec`] is the single encode/decode choke point, and
//! [`transaction`] issues the ids that correlate requests with server
//! acknowledgments.

pub mod codec;
pub mod frames;
pub mod transaction;

pub use codec::{decode_frame, encode_frame, CodecError};
pub use frames::{error_codes, ClientFrame, ConfigureBody, ServerFrame};
pub use transaction::TransactionCounter;
