//! Inbound frame routing.
//!
//! One signaling connection carries frames for any number of sessions. The
//! router owns the live sessions, decodes each raw frame once, and hands it
//! to the owning state machine. Routing is a single dispatch path, so each
//! session sees its frames in arrival order; frames for different sessions
//! never reorder each other because the router processes one frame at a
//! time.
//!
//! Frames for unknown sessions are dropped with a logged diagnostic and
//! counted: they are expected during teardown races (a server event can
//! cross a `close` frame on the wire) and must not kill the connection.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use rtc_core::error::SessionError;
use rtc_core::protocol::codec::decode_frame;
use rtc_core::protocol::frames::ServerFrame;

use crate::application::session::Session;

/// Owns the live sessions on one signaling connection and routes inbound
/// frames to them.
#[derive(Default)]
pub struct MessageRouter {
    sessions: HashMap<Uuid, Session>,
    orphans: u64,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a session. Frames for its id are routed to it
    /// until [`remove`](Self::remove).
    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.id(), session);
    }

    /// Releases a session back to the caller.
    pub fn remove(&mut self, id: &Uuid) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn get_mut(&mut self, id: &Uuid) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Frames dropped so far because no session claimed them.
    pub fn orphan_count(&self) -> u64 {
        self.orphans
    }

    /// Decodes and routes one raw text frame.
    ///
    /// # Errors
    ///
    /// [`SessionError::ProtocolDecodeError`] when the text is not a valid
    /// frame. The error is surfaced so the caller can log or count it, but
    /// no session state was touched and the connection keeps going.
    pub async fn route_raw(&mut self, raw: &str) -> Result<(), SessionError> {
        let frame =
            decode_frame(raw).map_err(|e| SessionError::ProtocolDecodeError(e.to_string()))?;
        self.route(frame).await
    }

    /// Routes one decoded frame to the owning session.
    ///
    /// Unknown session ids are non-fatal: the frame is dropped, the orphan
    /// counter incremented, and `Ok(())` returned.
    pub async fn route(&mut self, frame: ServerFrame) -> Result<(), SessionError> {
        let Some(session_id) = frame.session_id() else {
            // Connection-level errors target no session.
            warn!(frame = frame.type_name(), "sessionless frame; ignored");
            return Ok(());
        };
        match self.sessions.get_mut(&session_id) {
            Some(session) => session.handle_frame(frame).await,
            None => {
                self.orphans += 1;
                debug!(
                    error = %SessionError::OrphanMessage(session_id),
                    frame = frame.type_name(),
                    "frame for unknown session dropped"
                );
                Ok(())
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::port::LoopbackPort;
    use tokio::sync::mpsc;

    fn router_with_one_session() -> (MessageRouter, Uuid) {
        let (tx, mut rx) = mpsc::channel(64);
        tokio::spawn(async move { while rx.recv().await.is_some() {} });
        let (session, mut events) = Session::new(Box::new(LoopbackPort::new()), tx);
        tokio::spawn(async move { while events.recv().await.is_some() {} });
        let id = session.id();
        let mut router = MessageRouter::new();
        router.insert(session);
        (router, id)
    }

    #[tokio::test]
    async fn test_unknown_session_id_is_counted_not_fatal() {
        let (mut router, _id) = router_with_one_session();
        let stranger = Uuid::new_v4();
        let raw = format!(r#"{{"type":"ack","session_id":"{stranger}","transaction":1}}"#);

        assert!(router.route_raw(&raw).await.is_ok());
        assert_eq!(router.orphan_count(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_frame_surfaces_decode_error() {
        let (mut router, id) = router_with_one_session();

        let err = router.route_raw("{{{garbage").await.unwrap_err();
        assert!(matches!(err, SessionError::ProtocolDecodeError(_)));

        // The session is untouched and still routable.
        assert!(router.get_mut(&id).is_some());
        let raw = format!(r#"{{"type":"ack","session_id":"{id}","transaction":1}}"#);
        assert!(router.route_raw(&raw).await.is_ok());
        assert_eq!(router.orphan_count(), 0);
    }

    #[tokio::test]
    async fn test_sessionless_error_frame_is_ignored() {
        let (mut router, _id) = router_with_one_session();
        let raw = r#"{"type":"error","code":458,"reason":"no such session"}"#;
        assert!(router.route_raw(raw).await.is_ok());
        assert_eq!(router.orphan_count(), 0, "sessionless frames are not orphans");
    }

    #[tokio::test]
    async fn test_remove_releases_the_session() {
        let (mut router, id) = router_with_one_session();
        assert_eq!(router.len(), 1);

        let session = router.remove(&id).expect("session present");
        assert_eq!(session.id(), id);
        assert!(router.is_empty());

        // Frames for it are now orphans.
        let raw = format!(r#"{{"type":"ack","session_id":"{id}","transaction":1}}"#);
        router.route_raw(&raw).await.unwrap();
        assert_eq!(router.orphan_count(), 1);
    }
}
