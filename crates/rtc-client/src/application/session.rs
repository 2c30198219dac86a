//! The session state machine.
//!
//! One [`Session`] owns the complete lifecycle of one signaling session:
//!
//! ```text
//! connect() ──► Connecting ──attach()──► Attached ──negotiate()──► Negotiating
//!                                            ▲                         │
//!                                            │               remote description
//!                                            │                         ▼
//!                                         (renegotiate) ◄─────────── Active
//! ```
//!
//! All transitions for a session run on one logical task: the session is
//! driven either by its owner calling command methods or by the router
//! feeding it inbound frames, never both concurrently, so no locking is
//! needed. Multiple sessions are fully independent.
//!
//! Outbound frames go to an mpsc channel whose consumer pumps them onto the
//! signaling channel; typed [`SessionEvent`]s go to the receiver handed out
//! by [`Session::new`], exactly one per transition, in transition order.
//!
//! # Negotiation rules
//!
//! - At most one negotiation in flight: `negotiate()` while `Negotiating`
//!   fails with [`SessionError::NegotiationInProgress`], never queues.
//! - Changing the media intent while negotiating never touches the in-flight
//!   offer; the new intent is parked and reported by
//!   [`Session::take_pending_intent`] so the owner can renegotiate once the
//!   session is `Active` again.
//! - `close()` cancels any in-flight negotiation; descriptions that arrive
//!   after it are discarded, never applied.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use rtc_core::domain::artifact::{JsepKind, NegotiationArtifact, PortStats};
use rtc_core::domain::media::MediaIntent;
use rtc_core::domain::session::{CommandHandle, SessionEvent, SessionState};
use rtc_core::error::SessionError;
use rtc_core::protocol::frames::{error_codes, ClientFrame, ConfigureBody, ServerFrame};
use rtc_core::protocol::transaction::TransactionCounter;

use crate::infrastructure::port::NegotiationPort;

/// Buffered events per session. Subscribers that fall this far behind
/// apply backpressure to the session's driver.
const EVENT_BUFFER: usize = 32;

/// One signaling session and its state machine.
pub struct Session {
    id: Uuid,
    state: SessionState,
    context_id: Option<String>,
    intent: MediaIntent,
    /// Intent change received while a negotiation was in flight. Applied by
    /// the owner via [`take_pending_intent`](Self::take_pending_intent).
    pending_intent: Option<MediaIntent>,
    /// Exclusively owned for the session's lifetime; dropped on close.
    port: Option<Box<dyn NegotiationPort>>,
    /// The offer currently on the wire, if a negotiation is in flight.
    local_offer: Option<Arc<NegotiationArtifact>>,
    data_channel_open: bool,
    outbound: mpsc::Sender<ClientFrame>,
    events: mpsc::Sender<SessionEvent>,
    transactions: TransactionCounter,
}

impl Session {
    /// Creates an idle session owning `port`, returning it together with
    /// the receiver its lifecycle events arrive on.
    ///
    /// Outbound frames are pushed to `outbound`; the caller pumps that
    /// channel onto the signaling connection.
    pub fn new(
        port: Box<dyn NegotiationPort>,
        outbound: mpsc::Sender<ClientFrame>,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (events, event_rx) = mpsc::channel(EVENT_BUFFER);
        let session = Self {
            id: Uuid::new_v4(),
            state: SessionState::Idle,
            context_id: None,
            intent: MediaIntent::default(),
            pending_intent: None,
            port: Some(port),
            local_offer: None,
            data_channel_open: false,
            outbound,
            events,
            transactions: TransactionCounter::new(),
        };
        (session, event_rx)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The currently applied media intent.
    pub fn intent(&self) -> &MediaIntent {
        &self.intent
    }

    /// Whether the transport has reported the data channel open.
    pub fn data_channel_ready(&self) -> bool {
        self.data_channel_open
    }

    // ── Lifecycle commands ────────────────────────────────────────────────────

    /// Registers the session with the signaling server. `Idle → Connecting`.
    ///
    /// # Errors
    ///
    /// [`SessionError::TransportUnavailable`] when no negotiation port is
    /// configured (or the signaling channel is gone);
    /// [`SessionError::InvalidStateForCommand`] outside `Idle`.
    pub async fn connect(&mut self) -> Result<(), SessionError> {
        if self.port.is_none() {
            return Err(SessionError::TransportUnavailable);
        }
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidStateForCommand {
                state: self.state,
                command: "connect",
            });
        }
        let transaction = self.transactions.next();
        self.send_frame(ClientFrame::Create {
            session_id: self.id,
            transaction,
        })
        .await?;
        self.state = SessionState::Connecting;
        self.emit(SessionEvent::Connected { session_id: self.id })
            .await;
        Ok(())
    }

    /// Attaches an application context. `Connecting → Attached`.
    ///
    /// The server rejects unknown contexts asynchronously; that rejection
    /// arrives as an error frame and fails the session with
    /// [`SessionError::AttachRejected`].
    pub async fn attach(&mut self, context_id: &str) -> Result<(), SessionError> {
        if self.state != SessionState::Connecting {
            return Err(SessionError::InvalidStateForCommand {
                state: self.state,
                command: "attach",
            });
        }
        let transaction = self.transactions.next();
        self.send_frame(ClientFrame::Attach {
            session_id: self.id,
            context_id: context_id.to_string(),
            transaction,
        })
        .await?;
        self.context_id = Some(context_id.to_string());
        self.state = SessionState::Attached;
        self.emit(SessionEvent::Attached {
            session_id: self.id,
            context_id: context_id.to_string(),
        })
        .await;
        Ok(())
    }

    /// Starts a negotiation for `intent`. `Attached | Active → Negotiating`.
    ///
    /// Builds a local offer through the port, sends it in a `configure`
    /// frame, and trickles any candidates the port gathered up front.
    ///
    /// # Errors
    ///
    /// [`SessionError::NegotiationInProgress`] if one is already in flight;
    /// [`SessionError::NegotiationFailed`] (session → `Failed`) if the port
    /// cannot produce an offer.
    pub async fn negotiate(&mut self, intent: MediaIntent) -> Result<(), SessionError> {
        match self.state {
            SessionState::Negotiating => return Err(SessionError::NegotiationInProgress),
            SessionState::Attached | SessionState::Active => {}
            state => {
                return Err(SessionError::InvalidStateForCommand {
                    state,
                    command: "negotiate",
                })
            }
        }
        let offer = match self.port.as_mut() {
            Some(port) => port.create_offer(intent.clone()).await,
            None => return Err(SessionError::TransportUnavailable),
        };
        let offer = match offer {
            Ok(offer) => offer,
            Err(e) => {
                let error = SessionError::NegotiationFailed(e.to_string());
                self.fail(error.clone()).await;
                return Err(error);
            }
        };

        let transaction = self.transactions.next();
        self.send_frame(ClientFrame::Configure {
            session_id: self.id,
            transaction,
            body: ConfigureBody {
                audio: Some(intent.audio),
                video: Some(intent.video),
                bitrate: intent.bitrate_cap,
            },
            jsep: Some(offer.jsep.clone()),
        })
        .await?;
        for candidate in &offer.candidates {
            self.send_frame(ClientFrame::Trickle {
                session_id: self.id,
                candidate: candidate.clone(),
            })
            .await?;
        }

        self.intent = intent;
        self.local_offer = Some(offer);
        self.state = SessionState::Negotiating;
        self.emit(SessionEvent::Negotiated { session_id: self.id })
            .await;
        Ok(())
    }

    /// Records a new desired intent.
    ///
    /// Outside a negotiation the intent is applied directly (the owner
    /// still has to `negotiate()` for it to take effect on the wire).
    /// During a negotiation it is parked: the in-flight offer is never
    /// mutated, and the parked intent waits in
    /// [`take_pending_intent`](Self::take_pending_intent).
    pub fn set_intent(&mut self, intent: MediaIntent) {
        if self.state == SessionState::Negotiating {
            debug!(session = %self.id, "intent change during negotiation; parked for renegotiation");
            self.pending_intent = Some(intent);
        } else {
            self.intent = intent;
        }
    }

    /// Takes the intent parked during the last negotiation, if any. The
    /// owner renegotiates with it once the session is `Active`.
    pub fn take_pending_intent(&mut self) -> Option<MediaIntent> {
        self.pending_intent.take()
    }

    /// Tears the session down. Idempotent: every call after the first is a
    /// no-op, and exactly one `Closed` event is emitted per session.
    ///
    /// Cancels any in-flight negotiation, releases the negotiation port,
    /// and sends a best-effort `close` frame (the signaling channel may
    /// already be gone during shutdown, which is not an error here).
    pub async fn close(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        self.state = SessionState::Closing;
        self.local_offer = None;
        self.pending_intent = None;
        self.port = None;

        let transaction = self.transactions.next();
        if self
            .outbound
            .send(ClientFrame::Close {
                session_id: self.id,
                transaction,
            })
            .await
            .is_err()
        {
            debug!(session = %self.id, "signaling channel gone; close frame not sent");
        }

        self.state = SessionState::Closed;
        self.emit(SessionEvent::Closed { session_id: self.id })
            .await;
        Ok(())
    }

    /// Sends a protocol-level keepalive frame for this session.
    ///
    /// A no-op before `connect()` and after the session terminates.
    pub async fn keepalive(&self) -> Result<(), SessionError> {
        if self.state == SessionState::Idle || self.state.is_terminal() {
            return Ok(());
        }
        let transaction = self.transactions.next();
        self.send_frame(ClientFrame::KeepAlive {
            session_id: self.id,
            transaction,
        })
        .await
    }

    /// Current transport statistics from the negotiation port.
    pub async fn stats(&self) -> Result<PortStats, SessionError> {
        match &self.port {
            Some(port) => Ok(port.stats().await),
            None => Err(SessionError::TransportUnavailable),
        }
    }

    // ── Inbound ───────────────────────────────────────────────────────────────

    /// Applies a remote answer to the in-flight negotiation.
    /// `Negotiating → Active` on success, `→ Failed` on a malformed or
    /// rejected description.
    ///
    /// Artifacts arriving in a terminal or closing state are discarded
    /// silently per the cancellation rules.
    pub async fn on_remote_answer(
        &mut self,
        artifact: Arc<NegotiationArtifact>,
    ) -> Result<(), SessionError> {
        self.complete_negotiation(artifact, JsepKind::Answer).await
    }

    /// Applies a remote offer (a renegotiation initiated by the peer while
    /// our own offer is in flight is not supported; like
    /// [`on_remote_answer`](Self::on_remote_answer) this only completes the
    /// negotiation this session started).
    pub async fn on_remote_offer(
        &mut self,
        artifact: Arc<NegotiationArtifact>,
    ) -> Result<(), SessionError> {
        self.complete_negotiation(artifact, JsepKind::Offer).await
    }

    async fn complete_negotiation(
        &mut self,
        artifact: Arc<NegotiationArtifact>,
        expected: JsepKind,
    ) -> Result<(), SessionError> {
        if self.state == SessionState::Closing || self.state.is_terminal() {
            debug!(session = %self.id, state = %self.state, "late remote description discarded");
            return Ok(());
        }
        if self.state != SessionState::Negotiating {
            warn!(session = %self.id, state = %self.state, "remote description outside a negotiation; dropped");
            return Ok(());
        }
        if artifact.kind() != expected {
            let error = SessionError::NegotiationFailed(format!(
                "expected {:?} description, got {:?}",
                expected,
                artifact.kind()
            ));
            self.fail(error.clone()).await;
            return Err(error);
        }
        let applied = match self.port.as_mut() {
            Some(port) => port.apply_remote(artifact).await,
            None => return Err(SessionError::TransportUnavailable),
        };
        if let Err(e) = applied {
            let error = SessionError::NegotiationFailed(e.to_string());
            self.fail(error.clone()).await;
            return Err(error);
        }

        self.local_offer = None;
        self.state = SessionState::Active;
        self.emit(SessionEvent::MediaActive {
            session_id: self.id,
            audio: self.intent.audio,
            video: self.intent.video,
        })
        .await;
        self.announce_data_channel_if_open().await;
        Ok(())
    }

    /// Routes one inbound server frame into the state machine.
    pub async fn handle_frame(&mut self, frame: ServerFrame) -> Result<(), SessionError> {
        match frame {
            ServerFrame::Ack { transaction, .. } => {
                self.emit(SessionEvent::CommandAcked {
                    session_id: self.id,
                    handle: CommandHandle(transaction),
                })
                .await;
                Ok(())
            }
            ServerFrame::Event { body, jsep, .. } => {
                if let Some(jsep) = jsep {
                    let artifact = Arc::new(NegotiationArtifact {
                        jsep,
                        candidates: Vec::new(),
                    });
                    match artifact.kind() {
                        JsepKind::Answer => self.on_remote_answer(artifact).await?,
                        JsepKind::Offer => self.on_remote_offer(artifact).await?,
                    }
                }
                if let Some(body) = body {
                    // The context signals it is finished with this session.
                    if body.get("result").and_then(|v| v.as_str()) == Some("done") {
                        debug!(session = %self.id, "context reported done; closing");
                        self.close().await?;
                    }
                }
                Ok(())
            }
            ServerFrame::Data { payload, .. } => {
                // A payload arriving proves the channel is open even if the
                // port has not said so yet.
                if !self.data_channel_open {
                    self.data_channel_open = true;
                    self.emit(SessionEvent::DataChannelOpen { session_id: self.id })
                        .await;
                }
                self.emit(SessionEvent::DataReceived {
                    session_id: self.id,
                    payload,
                })
                .await;
                Ok(())
            }
            ServerFrame::Error {
                code,
                reason,
                transaction,
                ..
            } => self.handle_error_frame(code, reason, transaction).await,
            ServerFrame::Closed { .. } => {
                if self.state != SessionState::Closed {
                    self.state = SessionState::Closed;
                    self.local_offer = None;
                    self.pending_intent = None;
                    self.port = None;
                    self.emit(SessionEvent::Closed { session_id: self.id })
                        .await;
                }
                Ok(())
            }
        }
    }

    async fn handle_error_frame(
        &mut self,
        code: u16,
        reason: String,
        transaction: Option<u64>,
    ) -> Result<(), SessionError> {
        if code == error_codes::CONTEXT_REJECTED {
            let error = SessionError::AttachRejected(reason);
            self.fail(error.clone()).await;
            return Err(error);
        }
        if self.state == SessionState::Negotiating {
            let error = SessionError::NegotiationFailed(format!("{code}: {reason}"));
            self.fail(error.clone()).await;
            return Err(error);
        }
        if let Some(transaction) = transaction {
            self.emit(SessionEvent::CommandFailed {
                session_id: self.id,
                handle: CommandHandle(transaction),
                code,
                reason,
            })
            .await;
            return Ok(());
        }
        warn!(session = %self.id, code, %reason, "unattributed server error; ignored");
        Ok(())
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    async fn announce_data_channel_if_open(&mut self) {
        let open = self
            .port
            .as_ref()
            .is_some_and(|port| port.data_channel_open());
        if open && !self.data_channel_open {
            self.data_channel_open = true;
            self.emit(SessionEvent::DataChannelOpen { session_id: self.id })
                .await;
        }
    }

    async fn fail(&mut self, error: SessionError) {
        self.state = SessionState::Failed;
        self.local_offer = None;
        self.emit(SessionEvent::Failed {
            session_id: self.id,
            error,
        })
        .await;
    }

    pub(crate) async fn emit(&self, event: SessionEvent) {
        if self.events.send(event).await.is_err() {
            debug!(session = %self.id, "event subscriber dropped; event discarded");
        }
    }

    pub(crate) async fn send_frame(&self, frame: ClientFrame) -> Result<(), SessionError> {
        self.outbound
            .send(frame)
            .await
            .map_err(|_| SessionError::TransportUnavailable)
    }

    pub(crate) fn next_transaction(&self) -> u64 {
        self.transactions.next()
    }

    pub(crate) fn intent_mut(&mut self) -> &mut MediaIntent {
        &mut self.intent
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
