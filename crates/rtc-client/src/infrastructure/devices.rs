//! Capture/playback device enumeration.
//!
//! The session core only ever *reads* devices: it picks identifiers out of
//! a catalog and records them in a [`MediaIntent`]. Enumeration itself is a
//! collaborator behind the [`DeviceCatalog`] trait, so platform device APIs
//! stay out of the core entirely.

use rtc_core::domain::media::{Device, DeviceKind, MediaIntent};

/// A read-only source of capture and playback devices.
///
/// Implementations expose a lazy sequence; callers that only need the first
/// matching device never force a full enumeration.
pub trait DeviceCatalog {
    fn devices(&self) -> Box<dyn Iterator<Item = Device> + '_>;

    /// First device of the given kind, if any.
    fn first_of_kind(&self, kind: DeviceKind) -> Option<Device> {
        self.devices().find(|d| d.kind == kind)
    }
}

/// A catalog over a fixed list of devices.
///
/// Used by the demo binary and tests; a production build would put a
/// platform enumerator behind the same trait.
pub struct StaticCatalog {
    devices: Vec<Device>,
}

impl StaticCatalog {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

impl DeviceCatalog for StaticCatalog {
    fn devices(&self) -> Box<dyn Iterator<Item = Device> + '_> {
        Box::new(self.devices.iter().cloned())
    }
}

/// Fills unset device fields of `intent` with the first catalog device of
/// each relevant kind.
///
/// Explicit selections are left alone. Kinds the intent does not use are
/// not filled in.
pub fn apply_default_devices(catalog: &dyn DeviceCatalog, intent: &mut MediaIntent) {
    if intent.audio && intent.audio_device.is_none() {
        intent.audio_device = catalog
            .first_of_kind(DeviceKind::AudioInput)
            .map(|d| d.device_id);
    }
    if intent.video && intent.video_device.is_none() {
        intent.video_device = catalog
            .first_of_kind(DeviceKind::VideoInput)
            .map(|d| d.device_id);
    }
    if intent.audio_output_device.is_none() {
        intent.audio_output_device = catalog
            .first_of_kind(DeviceKind::AudioOutput)
            .map(|d| d.device_id);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new(vec![
            Device {
                device_id: "mic-0".to_string(),
                kind: DeviceKind::AudioInput,
                label: "Built-in Microphone".to_string(),
            },
            Device {
                device_id: "mic-1".to_string(),
                kind: DeviceKind::AudioInput,
                label: String::new(),
            },
            Device {
                device_id: "cam-0".to_string(),
                kind: DeviceKind::VideoInput,
                label: "USB Camera".to_string(),
            },
            Device {
                device_id: "spk-0".to_string(),
                kind: DeviceKind::AudioOutput,
                label: "Speakers".to_string(),
            },
        ])
    }

    #[test]
    fn test_first_of_kind_returns_first_match() {
        let catalog = catalog();
        let mic = catalog.first_of_kind(DeviceKind::AudioInput).unwrap();
        assert_eq!(mic.device_id, "mic-0");
    }

    #[test]
    fn test_first_of_kind_returns_none_for_absent_kind() {
        let catalog = StaticCatalog::new(vec![]);
        assert!(catalog.first_of_kind(DeviceKind::VideoInput).is_none());
    }

    #[test]
    fn test_defaults_fill_only_enabled_unset_fields() {
        let catalog = catalog();
        let mut intent = MediaIntent {
            audio: true,
            video: false,
            data: true,
            ..MediaIntent::default()
        };
        apply_default_devices(&catalog, &mut intent);
        assert_eq!(intent.audio_device.as_deref(), Some("mic-0"));
        assert_eq!(intent.video_device, None, "video is disabled");
        assert_eq!(intent.audio_output_device.as_deref(), Some("spk-0"));
    }

    #[test]
    fn test_defaults_never_override_explicit_selection() {
        let catalog = catalog();
        let mut intent = MediaIntent {
            audio: true,
            audio_device: Some("mic-1".to_string()),
            ..MediaIntent::default()
        };
        apply_default_devices(&catalog, &mut intent);
        assert_eq!(intent.audio_device.as_deref(), Some("mic-1"));
    }

    #[test]
    fn test_unlabeled_device_still_has_a_display_label() {
        let catalog = catalog();
        let unlabeled = catalog
            .devices()
            .find(|d| d.device_id == "mic-1")
            .unwrap();
        assert_eq!(unlabeled.display_label(), "mic-1");
    }
}
