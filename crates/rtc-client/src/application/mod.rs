//! Coordination logic: the session state machine, the inbound message
//! router, and the outbound command dispatcher.

pub mod dispatch;
pub mod router;
pub mod session;
