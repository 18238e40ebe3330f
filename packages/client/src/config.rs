use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

pub const BASE_URL: &str = "https://api.folio.app";
pub const V1_BASE_URL: &str = "https://api.folio.app/api/v1";
pub const WS_V1_BASE_URL: &str = "wss://api.folio.app/api/v1";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Folio client configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_v1_base_url")]
    pub v1_base_url: String,

    #[serde(default = "default_ws_v1_base_url")]
    pub ws_v1_base_url: String,

    #[serde(default)]
    pub heartbeat: HeartbeatConfig,

    #[serde(default)]
    pub toast: ToastConfig,
}

fn default_base_url() -> String {
    BASE_URL.to_string()
}

fn default_v1_base_url() -> String {
    V1_BASE_URL.to_string()
}

fn default_ws_v1_base_url() -> String {
    WS_V1_BASE_URL.to_string()
}

/// Liveness policy of the notification socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeartbeatConfig {
    /// How often to check whether a heartbeat arrived
    pub check_interval_ms: u64,

    /// Consecutive checks without a heartbeat before reconnecting
    pub max_missed: u32,

    /// Pause before a reconnect attempt
    pub reconnect_delay_ms: u64,
}

impl HeartbeatConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            check_interval_ms: 30_000,
            max_missed: 5,
            reconnect_delay_ms: 2_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToastConfig {
    /// Lifetime of non-persistent toasts
    pub duration_ms: u64,
}

impl ToastConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self { duration_ms: 5_000 }
    }
}

impl ClientConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = Self::path_in(dir);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "loaded client config");
            Ok(config)
        } else {
            Ok(ClientConfig::default())
        }
    }

    /// Write config into `dir`, returning the file path
    pub fn save(&self, dir: &Path) -> Result<PathBuf, ConfigError> {
        let config_path = Self::path_in(dir);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, json)?;
        Ok(config_path)
    }

    pub fn path_in(dir: &Path) -> PathBuf {
        dir.join(DEFAULT_CONFIG_NAME)
    }

    /// WebSocket URL of the notification channel for `token`.
    ///
    /// The token is percent-encoded into the query string.
    pub fn notifications_url(&self, token: &str) -> String {
        format!(
            "{}/ws/notifications?token={}",
            self.ws_v1_base_url.trim_end_matches('/'),
            urlencoding::encode(token)
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            v1_base_url: default_v1_base_url(),
            ws_v1_base_url: default_ws_v1_base_url(),
            heartbeat: HeartbeatConfig::default(),
            toast: ToastConfig::default(),
        }
    }
}
