//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where the backend process listens
    #[serde(default)]
    pub bridge: BridgeConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Backend bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Base URL commands are posted under (`{base_url}/invoke/{command}`)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL of the event stream (`{ws_url}/events`)
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Delay between event stream reconnection attempts in milliseconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,
    /// Maximum consecutive reconnection attempts (0 = infinite)
    #[serde(default)]
    pub max_reconnect_attempts: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            ws_url: default_ws_url(),
            request_timeout_seconds: default_request_timeout(),
            reconnect_delay_ms: default_reconnect_delay(),
            max_reconnect_attempts: 0,
        }
    }
}

impl BridgeConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:1430".to_string()
}

fn default_ws_url() -> String {
    "ws://127.0.0.1:1430".to_string()
}

// Draw-history fetches can take minutes on a cold database.
fn default_request_timeout() -> u64 {
    600
}

fn default_reconnect_delay() -> u64 {
    1000
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// How long notices stay on screen, in milliseconds
    #[serde(default = "default_notice_dismiss")]
    pub notice_dismiss_ms: u64,
    /// Ceiling on the number of days requested from the backend in one fetch
    #[serde(default = "default_max_fetch_days")]
    pub max_fetch_days: i64,
    /// Loss sequences above this are highlighted as good bets
    #[serde(default = "default_highlight_threshold")]
    pub highlight_threshold: i32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            notice_dismiss_ms: default_notice_dismiss(),
            max_fetch_days: default_max_fetch_days(),
            highlight_threshold: default_highlight_threshold(),
        }
    }
}

impl AppSettings {
    pub fn notice_dismiss(&self) -> Duration {
        Duration::from_millis(self.notice_dismiss_ms)
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_notice_dismiss() -> u64 {
    5000
}

fn default_max_fetch_days() -> i64 {
    crate::session::dates::MAX_FETCH_DAYS
}

fn default_highlight_threshold() -> i32 {
    8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.settings.max_fetch_days, 1600);
        assert_eq!(config.settings.notice_dismiss(), Duration::from_secs(5));
        assert_eq!(config.settings.highlight_threshold, 8);
        assert_eq!(config.bridge.base_url, "http://127.0.0.1:1430");
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"settings": {"log_level": "debug"}}"#).unwrap();
        assert_eq!(config.settings.log_level, "debug");
        assert_eq!(config.settings.max_fetch_days, 1600);
        assert_eq!(config.bridge.request_timeout_seconds, 600);
        assert_eq!(config.bridge.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.bridge.max_reconnect_attempts, 0);
    }
}
