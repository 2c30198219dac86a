//! Outbound command dispatch.
//!
//! Commands are the caller's mid-session intents: toggling media, capping
//! the bitrate, sending data. Each is validated against the current session
//! state *before* anything is serialized: a rejected command returns an
//! error synchronously and leaves the session exactly as it was.
//!
//! A successful dispatch returns the [`CommandHandle`] the frame was sent
//! with; the server's acknowledgment arrives later as a
//! [`CommandAcked`](rtc_core::SessionEvent::CommandAcked) or
//! [`CommandFailed`](rtc_core::SessionEvent::CommandFailed) event carrying
//! the same handle.

use tracing::debug;

use rtc_core::domain::media::MediaKind;
use rtc_core::domain::session::{CommandHandle, SessionState};
use rtc_core::error::SessionError;
use rtc_core::protocol::frames::{ClientFrame, ConfigureBody};

use crate::application::session::Session;

/// A validated, serializable caller intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Enable or disable one media kind mid-session.
    ToggleMedia { kind: MediaKind, enabled: bool },
    /// Cap the send bitrate. `0` means uncapped; negative values are
    /// rejected.
    SetBitrateCap { bps: i64 },
    /// Send a payload over the data channel.
    SendData { payload: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::ToggleMedia { .. } => "toggle_media",
            Command::SetBitrateCap { .. } => "set_bitrate_cap",
            Command::SendData { .. } => "send_data",
        }
    }
}

impl Session {
    /// Validates and sends one command.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidStateForCommand`]: `ToggleMedia` outside
    ///   `Active`; `SetBitrateCap` before a context is attached or after
    ///   teardown.
    /// - [`SessionError::InvalidArgument`]: negative bitrate cap.
    /// - [`SessionError::ChannelNotReady`]: `SendData` before the data
    ///   channel opened.
    ///
    /// All validation failures leave the session state untouched.
    pub async fn dispatch(&mut self, command: Command) -> Result<CommandHandle, SessionError> {
        let name = command.name();
        match command {
            Command::ToggleMedia { kind, enabled } => {
                if self.state() != SessionState::Active {
                    return Err(SessionError::InvalidStateForCommand {
                        state: self.state(),
                        command: name,
                    });
                }
                let body = match kind {
                    MediaKind::Audio => ConfigureBody {
                        audio: Some(enabled),
                        ..ConfigureBody::default()
                    },
                    MediaKind::Video => ConfigureBody {
                        video: Some(enabled),
                        ..ConfigureBody::default()
                    },
                };
                let transaction = self.next_transaction();
                self.send_frame(ClientFrame::Configure {
                    session_id: self.id(),
                    transaction,
                    body,
                    jsep: None,
                })
                .await?;
                match kind {
                    MediaKind::Audio => self.intent_mut().audio = enabled,
                    MediaKind::Video => self.intent_mut().video = enabled,
                }
                debug!(session = %self.id(), %kind, enabled, "media toggled");
                Ok(CommandHandle(transaction))
            }

            Command::SetBitrateCap { bps } => {
                if bps < 0 {
                    return Err(SessionError::InvalidArgument(format!(
                        "bitrate cap must be >= 0, got {bps}"
                    )));
                }
                if !matches!(
                    self.state(),
                    SessionState::Attached | SessionState::Negotiating | SessionState::Active
                ) {
                    return Err(SessionError::InvalidStateForCommand {
                        state: self.state(),
                        command: name,
                    });
                }
                let transaction = self.next_transaction();
                // 0 on the wire tells the server to stop capping.
                self.send_frame(ClientFrame::Configure {
                    session_id: self.id(),
                    transaction,
                    body: ConfigureBody {
                        bitrate: Some(bps as u64),
                        ..ConfigureBody::default()
                    },
                    jsep: None,
                })
                .await?;
                self.intent_mut().bitrate_cap = if bps == 0 { None } else { Some(bps as u64) };
                Ok(CommandHandle(transaction))
            }

            Command::SendData { payload } => {
                if !self.data_channel_ready() {
                    return Err(SessionError::ChannelNotReady);
                }
                let transaction = self.next_transaction();
                self.send_frame(ClientFrame::Data {
                    session_id: self.id(),
                    transaction,
                    payload,
                })
                .await?;
                Ok(CommandHandle(transaction))
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
