//! An in-process negotiation port for tests and the demo binary.
//!
//! The loopback port does no real negotiation: it synthesizes a minimal SDP
//! from the media intent, accepts any answer whose media sections match the
//! offer it produced, and reports canned stats. It exists so the whole
//! session core can be exercised end to end without a transport engine.

use std::sync::Arc;

use async_trait::async_trait;

use rtc_core::domain::artifact::{Jsep, JsepKind, NegotiationArtifact, PortStats};
use rtc_core::domain::media::MediaIntent;

use super::{NegotiationPort, PortError};

/// Deterministic [`NegotiationPort`] implementation.
///
/// Failure modes are injectable for testing the unhappy paths:
/// [`LoopbackPort::failing_offers`] makes `create_offer` fail, and
/// [`LoopbackPort::rejecting_remotes`] makes `apply_remote` fail.
pub struct LoopbackPort {
    offer_failure: Option<String>,
    remote_rejection: Option<String>,
    /// Whether the last offer asked for a data channel. The channel is
    /// considered open once that offer's answer has been applied.
    pending_data: bool,
    data_open: bool,
    stats: PortStats,
}

impl LoopbackPort {
    pub fn new() -> Self {
        Self {
            offer_failure: None,
            remote_rejection: None,
            pending_data: false,
            data_open: false,
            stats: PortStats {
                bitrate_bps: 256_000,
                resolution: Some((640, 480)),
            },
        }
    }

    /// A port whose `create_offer` always fails with `reason`.
    pub fn failing_offers(reason: impl Into<String>) -> Self {
        Self {
            offer_failure: Some(reason.into()),
            ..Self::new()
        }
    }

    /// A port whose `apply_remote` always fails with `reason`.
    pub fn rejecting_remotes(reason: impl Into<String>) -> Self {
        Self {
            remote_rejection: Some(reason.into()),
            ..Self::new()
        }
    }

    /// Synthesizes the answer a remote loopback peer would send for `offer`.
    ///
    /// Mirrors the offer's media sections with the JSEP kind flipped, which
    /// is exactly what [`apply_remote`](NegotiationPort::apply_remote)
    /// expects back.
    pub fn answer_for(offer: &NegotiationArtifact) -> Arc<NegotiationArtifact> {
        Arc::new(NegotiationArtifact {
            jsep: Jsep {
                kind: JsepKind::Answer,
                sdp: offer.jsep.sdp.clone(),
            },
            candidates: Vec::new(),
        })
    }

    fn synthesize_sdp(intent: &MediaIntent) -> String {
        let mut sdp = String::from("v=0\r\no=- 0 0 IN IP4 127.0.0.1\r\ns=loopback\r\n");
        if intent.audio {
            sdp.push_str("m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n");
            if let Some(device) = &intent.audio_device {
                sdp.push_str(&format!("a=label:{device}\r\n"));
            }
        }
        if intent.video {
            sdp.push_str("m=video 9 UDP/TLS/RTP/SAVPF 96\r\n");
            if let Some(device) = &intent.video_device {
                sdp.push_str(&format!("a=label:{device}\r\n"));
            }
        }
        if intent.data {
            sdp.push_str("m=application 9 UDP/DTLS/SCTP webrtc-datachannel\r\n");
        }
        if let Some(cap) = intent.bitrate_cap {
            sdp.push_str(&format!("b=AS:{}\r\n", cap / 1000));
        }
        sdp
    }
}

impl Default for LoopbackPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NegotiationPort for LoopbackPort {
    async fn create_offer(
        &mut self,
        intent: MediaIntent,
    ) -> Result<Arc<NegotiationArtifact>, PortError> {
        if let Some(reason) = &self.offer_failure {
            return Err(PortError::OfferFailed(reason.clone()));
        }
        self.pending_data = intent.data;
        Ok(Arc::new(NegotiationArtifact::new(
            JsepKind::Offer,
            Self::synthesize_sdp(&intent),
        )))
    }

    async fn apply_remote(&mut self, artifact: Arc<NegotiationArtifact>) -> Result<(), PortError> {
        if let Some(reason) = &self.remote_rejection {
            return Err(PortError::RemoteRejected(reason.clone()));
        }
        if artifact.jsep.sdp.is_empty() {
            return Err(PortError::RemoteRejected("empty description".to_string()));
        }
        if self.pending_data {
            self.data_open = true;
        }
        Ok(())
    }

    fn data_channel_open(&self) -> bool {
        self.data_open
    }

    async fn stats(&self) -> PortStats {
        self.stats
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offer_reflects_the_intent() {
        let mut port = LoopbackPort::new();
        let intent = MediaIntent {
            audio: true,
            video: false,
            data: true,
            ..MediaIntent::default()
        };
        let offer = port.create_offer(intent).await.unwrap();
        assert_eq!(offer.kind(), JsepKind::Offer);
        assert!(offer.jsep.sdp.contains("m=audio"));
        assert!(!offer.jsep.sdp.contains("m=video"));
        assert!(offer.jsep.sdp.contains("webrtc-datachannel"));
    }

    #[tokio::test]
    async fn test_data_channel_opens_only_after_answer_applied() {
        let mut port = LoopbackPort::new();
        let offer = port
            .create_offer(MediaIntent::audio_video_data())
            .await
            .unwrap();
        assert!(!port.data_channel_open(), "not open before the answer");

        port.apply_remote(LoopbackPort::answer_for(&offer))
            .await
            .unwrap();
        assert!(port.data_channel_open());
    }

    #[tokio::test]
    async fn test_no_data_channel_when_intent_omits_data() {
        let mut port = LoopbackPort::new();
        let intent = MediaIntent {
            audio: true,
            ..MediaIntent::default()
        };
        let offer = port.create_offer(intent).await.unwrap();
        port.apply_remote(LoopbackPort::answer_for(&offer))
            .await
            .unwrap();
        assert!(!port.data_channel_open());
    }

    #[tokio::test]
    async fn test_injected_offer_failure() {
        let mut port = LoopbackPort::failing_offers("no camera");
        let result = port.create_offer(MediaIntent::audio_video_data()).await;
        assert_eq!(result, Err(PortError::OfferFailed("no camera".to_string())));
    }

    #[tokio::test]
    async fn test_empty_remote_description_is_rejected() {
        let mut port = LoopbackPort::new();
        port.create_offer(MediaIntent::audio_video_data())
            .await
            .unwrap();
        let empty = Arc::new(NegotiationArtifact::new(JsepKind::Answer, ""));
        assert!(matches!(
            port.apply_remote(empty).await,
            Err(PortError::RemoteRejected(_))
        ));
    }

    #[tokio::test]
    async fn test_bitrate_cap_lands_in_the_sdp() {
        let mut port = LoopbackPort::new();
        let intent = MediaIntent {
            video: true,
            bitrate_cap: Some(512_000),
            ..MediaIntent::default()
        };
        let offer = port.create_offer(intent).await.unwrap();
        assert!(offer.jsep.sdp.contains("b=AS:512"));
    }
}
