//! # rtc-client
//!
//! The signaling session client core: everything needed to negotiate and
//! manage real-time peer sessions against a signaling server, minus the
//! transport engine itself.
//!
//! # Layering
//!
//! - **`application`** – the session state machine, the inbound message
//!   router, and the outbound command dispatcher. Pure coordination logic;
//!   talks to the world only through channels and the negotiation port.
//! - **`infrastructure`** – adapters: the [`NegotiationPort`] trait the
//!   transport engine plugs into (with a loopback implementation for tests
//!   and demos), the WebSocket signaling channel, device enumeration, and
//!   config file storage.
//!
//! The shared vocabulary (frames, states, events, errors) lives in
//! [`rtc_core`].

pub mod application;
pub mod infrastructure;

pub use application::dispatch::Command;
pub use application::router::MessageRouter;
pub use application::session::Session;
pub use infrastructure::port::{LoopbackPort, NegotiationPort, PortError};
