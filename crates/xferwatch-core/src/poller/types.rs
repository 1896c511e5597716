use std::future::Future;
use std::time::Duration;

use crate::config::WatchConfig;
use crate::config::defaults::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_RELOAD_DELAY_MS};
use crate::errors::PollError;
use crate::status::TransferStatus;

/// Lifecycle of a [`StatusPoller`](super::StatusPoller).
///
/// `Stopped` is terminal: a new poller is required to poll again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No timer scheduled.
    Idle,
    /// Timer scheduled; the last known status was active (or not yet known).
    Polling,
    /// Timer cancelled by completion, failure, or `stop()`.
    Stopped,
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollState::Idle => write!(f, "idle"),
            PollState::Polling => write!(f, "polling"),
            PollState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Why the polling task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// The server reported `active: false`.
    Completed(TransferStatus),
    /// A status check failed; no reload is ever triggered.
    Failed(PollError),
    /// `stop()` was called, or the poller was dropped.
    Cancelled,
}

/// Result of a finished polling task.
#[derive(Debug, Clone, PartialEq)]
pub struct PollOutcome {
    pub reason: StopReason,
    /// Number of status requests issued.
    pub ticks: u32,
    /// Whether the reload trigger fired.
    pub reloaded: bool,
}

/// Fixed timing of the repeating check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollTiming {
    pub interval: Duration,
    pub reload_delay: Duration,
}

impl Default for PollTiming {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            reload_delay: Duration::from_millis(DEFAULT_RELOAD_DELAY_MS),
        }
    }
}

impl From<&WatchConfig> for PollTiming {
    fn from(config: &WatchConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            reload_delay: config.reload_delay(),
        }
    }
}

/// Transition of the host once a transfer has finished.
///
/// A reload still running when the poller is stopped is dropped.
pub trait ReloadTrigger: Send + Sync + 'static {
    fn reload(&self) -> impl Future<Output = ()> + Send;
}
