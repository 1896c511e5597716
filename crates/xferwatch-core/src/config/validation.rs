//! Configuration validation.

use crate::config::types::WatchConfig;
use crate::errors::ConfigError;

/// Validate a merged configuration.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidConfiguration`] naming the first offending key.
pub fn validate_config(config: &WatchConfig) -> Result<(), ConfigError> {
    let base_url = config.base_url();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(invalid(format!(
            "server.base_url must start with http:// or https://, got '{}'",
            base_url
        )));
    }

    for (key, path) in [
        ("server.status_path", config.status_path()),
        ("server.clear_path", config.clear_path()),
    ] {
        if !path.starts_with('/') {
            return Err(invalid(format!(
                "{} must start with '/', got '{}'",
                key, path
            )));
        }
    }

    if config.server.request_timeout_ms == Some(0) {
        return Err(invalid(
            "server.request_timeout_ms must be greater than zero".to_string(),
        ));
    }

    if config.poll.interval_ms == Some(0) {
        return Err(invalid(
            "poll.interval_ms must be greater than zero".to_string(),
        ));
    }

    if config.poll.reload_delay_ms == Some(0) {
        return Err(invalid(
            "poll.reload_delay_ms must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::InvalidConfiguration { message }
}
