//! TOML-based configuration persistence for the client.
//!
//! Reads and writes [`ClientConfig`] at the platform-appropriate path:
//! - Windows:  `%APPDATA%\RtcSession\config.toml`
//! - Linux:    `~/.config/rtc-session/config.toml`
//! - macOS:    `~/Library/Application Support/RtcSession/config.toml`
//!
//! Fields annotated with `#[serde(default = "some_fn")]` fall back to the
//! default when absent from the file, so the client works on first run and
//! across upgrades that add new fields. The CLI layers on top: any value
//! given on the command line or via environment variables wins over the
//! file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Client configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Signaling server URL (`ws://` or `wss://`).
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Application context to attach sessions to.
    #[serde(default = "default_context_id")]
    pub context_id: String,
    /// Seconds between keepalive frames. Server-side sessions expire
    /// without them.
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Seconds between transport stats polls while a session is active.
    #[serde(default = "default_stats_secs")]
    pub stats_secs: u64,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Preferred audio capture device id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_device: Option<String>,
    /// Preferred video capture device id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_device: Option<String>,
}

fn default_server_url() -> String {
    "ws://127.0.0.1:8188/".to_string()
}
fn default_context_id() -> String {
    "echo".to_string()
}
fn default_keepalive_secs() -> u64 {
    25
}
fn default_stats_secs() -> u64 {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            context_id: default_context_id(),
            keepalive_secs: default_keepalive_secs(),
            stats_secs: default_stats_secs(),
            log_level: default_log_level(),
            audio_device: None,
            video_device: None,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Resolves the full path to the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot
/// be determined from the environment.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    let dir = platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)?;
    Ok(dir.join("config.toml"))
}

/// Loads [`ClientConfig`] from `path`, returning the default config when the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not
/// found", and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ClientConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Persists `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &ClientConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("RtcSession"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("rtc-session"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("RtcSession")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_default_config_values() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.server_url, "ws://127.0.0.1:8188/");
        assert_eq!(cfg.context_id, "echo");
        assert_eq!(cfg.keepalive_secs, 25);
        assert_eq!(cfg.stats_secs, 1);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.audio_device.is_none());
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let mut cfg = ClientConfig::default();
        cfg.server_url = "wss://signal.example.net/rtc".to_string();
        cfg.video_device = Some("cam-0".to_string());

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: ClientConfig = toml::from_str(&text).expect("deserialize");
        assert_eq!(cfg, restored);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let cfg: ClientConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides_only_named_fields() {
        let cfg: ClientConfig =
            toml::from_str(r#"keepalive_secs = 10"#).expect("deserialize partial");
        assert_eq!(cfg.keepalive_secs, 10);
        assert_eq!(cfg.context_id, "echo", "unnamed fields keep defaults");
    }

    #[test]
    fn test_absent_device_fields_are_omitted_from_output() {
        let text = toml::to_string_pretty(&ClientConfig::default()).unwrap();
        assert!(!text.contains("audio_device"));
        assert!(!text.contains("video_device"));
    }

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/rtc-session-test/config.toml");
        let cfg = load_config(&path).expect("absent file must not be an error");
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn test_save_and_load_round_trip_via_temp_dir() {
        let dir = std::env::temp_dir().join(format!("rtc_test_{}", Uuid::new_v4()));
        let path = dir.join("config.toml");

        let mut cfg = ClientConfig::default();
        cfg.context_id = "videoroom".to_string();
        cfg.log_level = "debug".to_string();

        save_config(&cfg, &path).expect("save");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let dir = std::env::temp_dir().join(format!("rtc_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[[[ not valid toml").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }
}
