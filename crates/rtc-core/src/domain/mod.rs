//! Pure session domain model: lifecycle states and events, media
//! configuration, negotiation artifacts, and device descriptors.
//!
//! Nothing in this module performs I/O. Types here are shared between the
//! state machine, the command dispatcher, and the wire protocol.

pub mod artifact;
pub mod media;
pub mod session;
