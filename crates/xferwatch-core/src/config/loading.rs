//! Configuration loading and merging logic.
//!
//! Loads configuration from files and merges configurations from different
//! sources (user config, project config). Missing files are skipped; files
//! that exist but fail to parse are errors.

use crate::config::defaults::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};
use crate::config::types::{PollConfig, ServerConfig, WatchConfig};
use crate::config::validation::validate_config;
use crate::errors::ConfigError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load configuration from the hierarchy of config files.
///
/// Loads and merges configuration from:
/// 1. Default values
/// 2. User config (`~/.xferwatch/config.toml`)
/// 3. Project config (`./.xferwatch/config.toml`)
///
/// # Errors
///
/// Returns an error if a config file cannot be parsed or validation fails.
/// Missing config files are not errors.
pub fn load_hierarchy() -> Result<WatchConfig, ConfigError> {
    let user_path = dirs::home_dir().map(|home| config_path_in(&home));
    let project_path = std::env::current_dir()?.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME);
    load_from_paths(user_path.as_deref(), Some(&project_path))
}

/// Load and merge the config files at the given paths, user first.
pub fn load_from_paths(
    user_path: Option<&Path>,
    project_path: Option<&Path>,
) -> Result<WatchConfig, ConfigError> {
    let mut config = WatchConfig::default();

    for path in [user_path, project_path].into_iter().flatten() {
        match load_config_file(path) {
            Ok(file_config) => config = merge_configs(config, file_config),
            Err(ConfigError::ConfigNotFound { path }) => {
                debug!(event = "core.config.file_not_found", path = %path);
            }
            Err(e) => return Err(e),
        }
    }

    validate_config(&config)?;

    Ok(config)
}

fn config_path_in(dir: &Path) -> PathBuf {
    dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

/// Load a configuration file from the given path.
pub fn load_config_file(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::ConfigNotFound {
                path: path.display().to_string(),
            }
        } else {
            ConfigError::IoError { source: e }
        }
    })?;

    let config: WatchConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    debug!(event = "core.config.file_loaded", path = %path.display());

    Ok(config)
}

/// Merge two configurations, with override_config taking precedence.
pub fn merge_configs(base: WatchConfig, override_config: WatchConfig) -> WatchConfig {
    WatchConfig {
        server: ServerConfig {
            base_url: override_config.server.base_url.or(base.server.base_url),
            status_path: override_config
                .server
                .status_path
                .or(base.server.status_path),
            clear_path: override_config.server.clear_path.or(base.server.clear_path),
            request_timeout_ms: override_config
                .server
                .request_timeout_ms
                .or(base.server.request_timeout_ms),
        },
        poll: PollConfig {
            interval_ms: override_config.poll.interval_ms.or(base.poll.interval_ms),
            reload_delay_ms: override_config
                .poll
                .reload_delay_ms
                .or(base.poll.reload_delay_ms),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = config_path_in(dir);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let config = load_from_paths(Some(&missing), Some(&missing)).unwrap();
        assert_eq!(config, WatchConfig::default());
    }

    #[test]
    fn test_project_overrides_user() {
        let user_dir = tempfile::tempdir().unwrap();
        let project_dir = tempfile::tempdir().unwrap();
        let user = write_config(
            user_dir.path(),
            r#"
            [server]
            base_url = "http://user-box:5000"
            request_timeout_ms = 3000

            [poll]
            interval_ms = 4000
            "#,
        );
        let project = write_config(
            project_dir.path(),
            r#"
            [poll]
            interval_ms = 1500
            "#,
        );

        let config = load_from_paths(Some(&user), Some(&project)).unwrap();
        assert_eq!(config.base_url(), "http://user-box:5000");
        assert_eq!(config.request_timeout(), Some(Duration::from_millis(3000)));
        assert_eq!(config.poll_interval(), Duration::from_millis(1500));
        assert_eq!(config.reload_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[poll\ninterval_ms = ");

        let err = load_from_paths(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[poll]\nreload_delay_ms = 0\n");

        let err = load_from_paths(None, Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_merge_keeps_base_when_override_empty() {
        let base = WatchConfig {
            server: ServerConfig {
                base_url: Some("https://secure:443".to_string()),
                status_path: None,
                clear_path: Some("/reset".to_string()),
                request_timeout_ms: None,
            },
            poll: PollConfig {
                interval_ms: Some(100),
                reload_delay_ms: Some(50),
            },
        };
        let merged = merge_configs(base.clone(), WatchConfig::default());
        assert_eq!(merged, base);
    }
}
