//! Media configuration and capture/playback device descriptors.
//!
//! A [`MediaIntent`] is the caller's *declared* desired media configuration
//! for a session: which kinds of media to send, which devices to capture
//! from, and an optional bitrate cap. The intent is an input to offer
//! creation: changing it never mutates a negotiation already in flight, it
//! schedules a renegotiation instead.

use serde::{Deserialize, Serialize};

/// A toggleable media kind within an established session.
///
/// Data channels are not toggleable; they are requested up front via
/// [`MediaIntent::data`] and live for the duration of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Audio,
    Video,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

/// The caller's desired media configuration for a session.
///
/// Read by the negotiation step when building an offer. Device fields hold
/// opaque identifiers from a [`Device`] catalog; `None` means "let the
/// engine pick".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaIntent {
    /// Capture and send audio.
    pub audio: bool,
    /// Capture and send video.
    pub video: bool,
    /// Open a data channel alongside the media streams.
    pub data: bool,
    /// Capture device for audio, when `audio` is set.
    pub audio_device: Option<String>,
    /// Capture device for video, when `video` is set.
    pub video_device: Option<String>,
    /// Playback device for remote audio.
    ///
    /// Output routing is carried in the intent so it travels with the rest
    /// of the media configuration; engines that cannot route output ignore
    /// it.
    pub audio_output_device: Option<String>,
    /// Maximum send bitrate in bits per second. `None` means uncapped.
    pub bitrate_cap: Option<u64>,
}

impl MediaIntent {
    /// Audio + video + data with default devices and no bitrate cap.
    pub fn audio_video_data() -> Self {
        Self {
            audio: true,
            video: true,
            data: true,
            ..Self::default()
        }
    }

    /// Returns a copy with the given kind toggled.
    pub fn with_kind(mut self, kind: MediaKind, enabled: bool) -> Self {
        match kind {
            MediaKind::Audio => self.audio = enabled,
            MediaKind::Video => self.video = enabled,
        }
        self
    }
}

impl Default for MediaIntent {
    /// Nothing enabled, no devices selected, uncapped.
    fn default() -> Self {
        Self {
            audio: false,
            video: false,
            data: false,
            audio_device: None,
            video_device: None,
            audio_output_device: None,
            bitrate_cap: None,
        }
    }
}

/// The kind of a capture or playback device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceKind {
    AudioInput,
    VideoInput,
    AudioOutput,
}

/// A capture or playback device, as reported by a device catalog.
///
/// The core only reads device descriptors; enumeration lives behind a
/// catalog collaborator in the client crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Opaque identifier, stable for the lifetime of the enumeration.
    pub device_id: String,
    pub kind: DeviceKind,
    /// Human-readable label. May be empty when the platform withholds it
    /// (browsers do this before capture permission is granted).
    pub label: String,
}

impl Device {
    /// The label to present to a human.
    ///
    /// Falls back to the device id when the platform reported an empty
    /// label, so every device remains distinguishable in a picker or log.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.device_id
        } else {
            &self.label
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
