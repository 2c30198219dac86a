//! WebSocket signaling channel.
//!
//! One connection to the signaling server carries all sessions' frames.
//! This adapter owns the socket and exposes typed send plus raw receive;
//! decoding happens in the router so that decode failures are handled in
//! one place.

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, trace};

use rtc_core::protocol::codec::encode_frame;
use rtc_core::protocol::frames::ClientFrame;

/// A connected signaling channel.
pub struct SignalingChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    url: String,
}

impl SignalingChannel {
    /// Connects to the signaling server at `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (stream, response) = connect_async(url)
            .await
            .with_context(|| format!("failed to connect to signaling server at {url}"))?;
        debug!(status = %response.status(), %url, "signaling channel connected");
        Ok(Self {
            stream,
            url: url.to_string(),
        })
    }

    /// Sends one client frame as a text message.
    pub async fn send(&mut self, frame: &ClientFrame) -> anyhow::Result<()> {
        let text = encode_frame(frame).context("failed to encode outbound frame")?;
        trace!(frame = frame.type_name(), "sending frame");
        self.stream
            .send(Message::Text(text))
            .await
            .with_context(|| format!("failed to send {} frame to {}", frame.type_name(), self.url))
    }

    /// Receives the next raw text frame.
    ///
    /// Control messages (ping/pong) are handled by tungstenite underneath;
    /// binary frames are skipped with a log line since this protocol is
    /// text-only. Returns `None` once the server closes the connection.
    pub async fn recv(&mut self) -> anyhow::Result<Option<String>> {
        while let Some(message) = self.stream.next().await {
            let message = message.context("signaling channel read failed")?;
            match message {
                Message::Text(text) => return Ok(Some(text)),
                Message::Close(_) => {
                    debug!(url = %self.url, "signaling server closed the connection");
                    return Ok(None);
                }
                Message::Binary(bytes) => {
                    debug!(len = bytes.len(), "ignoring unexpected binary frame");
                }
                // Ping/pong are answered by the library; frame-level
                // keepalives are a separate, protocol-level concern.
                _ => {}
            }
        }
        Ok(None)
    }

    /// Closes the channel gracefully.
    pub async fn close(&mut self) -> anyhow::Result<()> {
        self.stream
            .close(None)
            .await
            .context("failed to close signaling channel")
    }
}
