//! Configuration type definitions for xferwatch.
//!
//! Every field is optional so that configs from different sources can be
//! merged; the accessor methods on [`WatchConfig`] resolve defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! [server]
//! base_url = "http://localhost:5000"
//! status_path = "/status"
//! clear_path = "/clear_status"
//!
//! [poll]
//! interval_ms = 2000
//! reload_delay_ms = 1000
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults;

/// Main configuration loaded from TOML config files.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct WatchConfig {
    /// Where the transfer server lives
    #[serde(default)]
    pub server: ServerConfig,

    /// Polling cadence
    #[serde(default)]
    pub poll: PollConfig,
}

/// Transfer server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the transfer server.
    /// Default: `http://localhost:5000`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Path of the status resource, relative to `base_url`.
    /// Default: `/status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_path: Option<String>,

    /// Path of the resource that resets the status (`POST`).
    /// Default: `/clear_status`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear_path: Option<String>,

    /// Per-request timeout. Unset means the transport default (no timeout).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

/// Polling cadence settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PollConfig {
    /// Interval between status checks. Default: 2000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,

    /// Pause between a finished transfer and the reload. Default: 1000ms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload_delay_ms: Option<u64>,
}

impl WatchConfig {
    pub fn base_url(&self) -> &str {
        self.server
            .base_url
            .as_deref()
            .unwrap_or(defaults::DEFAULT_BASE_URL)
    }

    pub fn status_path(&self) -> &str {
        self.server
            .status_path
            .as_deref()
            .unwrap_or(defaults::DEFAULT_STATUS_PATH)
    }

    pub fn clear_path(&self) -> &str {
        self.server
            .clear_path
            .as_deref()
            .unwrap_or(defaults::DEFAULT_CLEAR_PATH)
    }

    /// Full URL of the status resource.
    pub fn status_url(&self) -> String {
        self.url_for(self.status_path())
    }

    /// Full URL of the status reset resource.
    pub fn clear_url(&self) -> String {
        self.url_for(self.clear_path())
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url().trim_end_matches('/'), path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.server.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll
                .interval_ms
                .unwrap_or(defaults::DEFAULT_POLL_INTERVAL_MS),
        )
    }

    pub fn reload_delay(&self) -> Duration {
        Duration::from_millis(
            self.poll
                .reload_delay_ms
                .unwrap_or(defaults::DEFAULT_RELOAD_DELAY_MS),
        )
    }
}
