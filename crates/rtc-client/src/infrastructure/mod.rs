//! Adapters between the session core and the outside world: the transport
//! negotiation port, the WebSocket signaling channel, device enumeration,
//! and config storage.

pub mod devices;
pub mod port;
pub mod signaling;
pub mod storage;
