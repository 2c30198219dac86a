//! rtc-client: demo session client entry point.
//!
//! Connects to a signaling server, attaches an application context, and
//! negotiates one audio/video/data session through the loopback negotiation
//! port. While the session is active it keeps the server-side session alive,
//! polls transport statistics, echoes received data payloads to the log, and
//! renegotiates when the media intent changed mid-negotiation.
//!
//! # Usage
//!
//! ```text
//! rtc-client [OPTIONS]
//!
//! Options:
//!   --server <URL>          Signaling server URL [default: from config file]
//!   --context <ID>          Application context to attach [default: echo]
//!   --no-audio              Do not send audio
//!   --no-video              Do not send video
//!   --no-data               Do not open a data channel
//!   --audio-device <ID>     Audio capture device id
//!   --video-device <ID>     Video capture device id
//!   --bitrate <BPS>         Send bitrate cap in bits/sec (0 = uncapped)
//!   --keepalive-secs <SECS> Seconds between keepalive frames
//!   --send-data <TEXT>      Payload to send once the data channel opens
//!   --config <PATH>         Config file path (default: platform config dir)
//! ```
//!
//! # Environment variable overrides
//!
//! Every option can also come from the environment (`RTC_SERVER_URL`,
//! `RTC_CONTEXT`, `RTC_AUDIO_DEVICE`, `RTC_VIDEO_DEVICE`, `RTC_BITRATE`,
//! `RTC_KEEPALIVE_SECS`, `RTC_SEND_DATA`, `RTC_CONFIG`). Precedence:
//! CLI argument > environment variable > config file > built-in default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use rtc_core::domain::media::{Device, DeviceKind, MediaIntent};
use rtc_core::domain::session::{SessionEvent, SessionState};
use rtc_core::protocol::frames::ClientFrame;
use uuid::Uuid;

use rtc_client::application::dispatch::Command;
use rtc_client::application::router::MessageRouter;
use rtc_client::application::session::Session;
use rtc_client::infrastructure::devices::{apply_default_devices, StaticCatalog};
use rtc_client::infrastructure::port::LoopbackPort;
use rtc_client::infrastructure::signaling::SignalingChannel;
use rtc_client::infrastructure::storage::{self, ClientConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Signaling session demo client.
#[derive(Debug, Parser)]
#[command(
    name = "rtc-client",
    about = "Negotiate and manage a real-time session against a signaling server",
    version
)]
struct Cli {
    /// Config file path. Defaults to the platform config directory.
    #[arg(long, env = "RTC_CONFIG")]
    config: Option<PathBuf>,

    /// Signaling server URL (ws:// or wss://).
    #[arg(long, env = "RTC_SERVER_URL")]
    server: Option<String>,

    /// Application context to attach the session to.
    #[arg(long, env = "RTC_CONTEXT")]
    context: Option<String>,

    /// Do not capture or send audio.
    #[arg(long, default_value_t = false)]
    no_audio: bool,

    /// Do not capture or send video.
    #[arg(long, default_value_t = false)]
    no_video: bool,

    /// Do not open a data channel.
    #[arg(long, default_value_t = false)]
    no_data: bool,

    /// Audio capture device id.
    #[arg(long, env = "RTC_AUDIO_DEVICE")]
    audio_device: Option<String>,

    /// Video capture device id.
    #[arg(long, env = "RTC_VIDEO_DEVICE")]
    video_device: Option<String>,

    /// Send bitrate cap in bits per second. 0 means uncapped.
    #[arg(long, env = "RTC_BITRATE")]
    bitrate: Option<u64>,

    /// Seconds between protocol keepalive frames.
    #[arg(long, env = "RTC_KEEPALIVE_SECS")]
    keepalive_secs: Option<u64>,

    /// Payload to send once the data channel opens.
    #[arg(long, env = "RTC_SEND_DATA")]
    send_data: Option<String>,
}

impl Cli {
    /// Layers CLI/env values over the config file values.
    fn merged_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(server) = &self.server {
            config.server_url = server.clone();
        }
        if let Some(context) = &self.context {
            config.context_id = context.clone();
        }
        if let Some(secs) = self.keepalive_secs {
            config.keepalive_secs = secs;
        }
        if let Some(device) = &self.audio_device {
            config.audio_device = Some(device.clone());
        }
        if let Some(device) = &self.video_device {
            config.video_device = Some(device.clone());
        }
        config
    }

    /// Builds the initial media intent from the merged config.
    fn media_intent(&self, config: &ClientConfig) -> MediaIntent {
        MediaIntent {
            audio: !self.no_audio,
            video: !self.no_video,
            data: !self.no_data,
            audio_device: config.audio_device.clone(),
            video_device: config.video_device.clone(),
            audio_output_device: None,
            bitrate_cap: match self.bitrate {
                Some(0) | None => None,
                Some(bps) => Some(bps),
            },
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => storage::config_file_path().context("could not resolve config file path")?,
    };
    let config = cli.merged_config(
        storage::load_config(&config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?,
    );

    let mut intent = cli.media_intent(&config);
    apply_default_devices(&demo_catalog(), &mut intent);

    info!(
        server = %config.server_url,
        context = %config.context_id,
        audio = intent.audio,
        video = intent.video,
        data = intent.data,
        "rtc-client starting"
    );

    run(config, intent, cli.send_data).await
}

/// The fixed catalog the demo binary picks default devices from. A real
/// deployment replaces this with a platform enumerator behind the same
/// trait.
fn demo_catalog() -> StaticCatalog {
    StaticCatalog::new(vec![
        Device {
            device_id: "default-mic".to_string(),
            kind: DeviceKind::AudioInput,
            label: "Default Microphone".to_string(),
        },
        Device {
            device_id: "default-cam".to_string(),
            kind: DeviceKind::VideoInput,
            label: "Default Camera".to_string(),
        },
        Device {
            device_id: "default-out".to_string(),
            kind: DeviceKind::AudioOutput,
            label: String::new(),
        },
    ])
}

// ── Main session loop ─────────────────────────────────────────────────────────

async fn run(
    config: ClientConfig,
    intent: MediaIntent,
    data_payload: Option<String>,
) -> anyhow::Result<()> {
    let mut channel = SignalingChannel::connect(&config.server_url).await?;

    let (outbound_tx, mut outbound_rx) = mpsc::channel::<ClientFrame>(64);
    let (session, mut events) = Session::new(Box::new(LoopbackPort::new()), outbound_tx);
    let session_id = session.id();
    let mut router = MessageRouter::new();
    router.insert(session);

    // Drive the session to its first negotiation. The frames these calls
    // produce sit in the outbound channel until the loop below pumps them.
    {
        let session = router
            .get_mut(&session_id)
            .context("session vanished from its own router")?;
        session.connect().await?;
        session.attach(&config.context_id).await?;
        session.negotiate(intent).await?;
    }

    let mut keepalive = tokio::time::interval(Duration::from_secs(config.keepalive_secs.max(1)));
    let mut stats_poll = tokio::time::interval(Duration::from_secs(config.stats_secs.max(1)));

    loop {
        tokio::select! {
            // Outbound frames from the session onto the wire.
            frame = outbound_rx.recv() => match frame {
                Some(frame) => channel.send(&frame).await?,
                None => break,
            },

            // Inbound frames from the wire into the router.
            inbound = channel.recv() => match inbound? {
                Some(raw) => {
                    if let Err(e) = router.route_raw(&raw).await {
                        warn!(error = %e, "inbound frame rejected");
                    }
                }
                None => {
                    info!("signaling server closed the connection");
                    break;
                }
            },

            // Typed session events back to us.
            event = events.recv() => match event {
                Some(event) => {
                    if !handle_event(&mut router, session_id, event, data_payload.as_deref()).await? {
                        break;
                    }
                }
                None => break,
            },

            _ = keepalive.tick() => {
                if let Some(session) = router.get_mut(&session_id) {
                    if let Err(e) = session.keepalive().await {
                        warn!(error = %e, "keepalive not sent");
                    }
                }
            }

            _ = stats_poll.tick() => {
                if let Some(session) = router.get_mut(&session_id) {
                    if session.state() == SessionState::Active {
                        if let Ok(stats) = session.stats().await {
                            info!(
                                bitrate_bps = stats.bitrate_bps,
                                resolution = ?stats.resolution,
                                "transport stats"
                            );
                        }
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, closing session");
                if let Some(session) = router.get_mut(&session_id) {
                    session.close().await.ok();
                }
                break;
            }
        }
    }

    // Flush whatever teardown produced (at most a close frame or two).
    while let Ok(frame) = outbound_rx.try_recv() {
        if channel.send(&frame).await.is_err() {
            break;
        }
    }
    channel.close().await.ok();
    info!("rtc-client stopped");
    Ok(())
}

/// Reacts to one session event. Returns `false` when the loop should stop.
async fn handle_event(
    router: &mut MessageRouter,
    session_id: Uuid,
    event: SessionEvent,
    data_payload: Option<&str>,
) -> anyhow::Result<bool> {
    match event {
        SessionEvent::MediaActive { audio, video, .. } => {
            info!(audio, video, "media active");
            // An intent change that arrived mid-negotiation is applied now.
            let pending = router
                .get_mut(&session_id)
                .and_then(|s| s.take_pending_intent());
            if let Some(intent) = pending {
                info!("renegotiating with the updated media intent");
                if let Some(session) = router.get_mut(&session_id) {
                    session.negotiate(intent).await?;
                }
            }
        }
        SessionEvent::DataChannelOpen { .. } => {
            info!("data channel open");
            if let Some(payload) = data_payload {
                if let Some(session) = router.get_mut(&session_id) {
                    let handle = session
                        .dispatch(Command::SendData {
                            payload: payload.to_string(),
                        })
                        .await?;
                    debug!(transaction = handle.0, "data payload dispatched");
                }
            }
        }
        SessionEvent::DataReceived { payload, .. } => {
            info!(%payload, "data received");
        }
        SessionEvent::CommandFailed {
            handle,
            code,
            reason,
            ..
        } => {
            warn!(transaction = handle.0, code, %reason, "command rejected by server");
        }
        SessionEvent::Failed { error, .. } => {
            error!(%error, "session failed");
            return Ok(false);
        }
        SessionEvent::Closed { .. } => {
            info!("session closed");
            return Ok(false);
        }
        other => {
            debug!(event = ?other, "session event");
        }
    }
    Ok(true)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
