//! Default values for configuration.

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

pub const DEFAULT_STATUS_PATH: &str = "/status";

pub const DEFAULT_CLEAR_PATH: &str = "/clear_status";

/// Interval between two status checks.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

/// Pause between observing a finished transfer and reloading.
pub const DEFAULT_RELOAD_DELAY_MS: u64 = 1000;

/// Name of the per-user and per-project config directory.
pub const CONFIG_DIR_NAME: &str = ".xferwatch";

pub const CONFIG_FILE_NAME: &str = "config.toml";
