use std::error::Error;

/// Base trait for all application errors
pub trait XferError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found at '{path}'")]
    ConfigNotFound { path: String },

    #[error("Failed to parse config file '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl XferError for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            ConfigError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            ConfigError::ConfigParseError { .. } | ConfigError::InvalidConfiguration { .. }
        )
    }
}

/// Failure of a single status check.
///
/// Every variant terminates polling; none of them triggers a reload.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PollError {
    #[error("Status endpoint unreachable: {message}")]
    Transport { message: String },

    #[error("Status request timed out")]
    Timeout,

    #[error("Status endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Status body is not valid JSON: {message}")]
    Decode { message: String },

    #[error("Status body has no boolean 'active' field")]
    MissingActive,

    #[error("Failed to build HTTP client: {message}")]
    ClientSetup { message: String },
}

impl PollError {
    /// Network-level failure: unreachable, refused, timed out.
    pub fn is_transport(&self) -> bool {
        matches!(self, PollError::Transport { .. } | PollError::Timeout)
    }

    /// The endpoint answered, but not with a usable status.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            PollError::HttpStatus { .. } | PollError::Decode { .. } | PollError::MissingActive
        )
    }
}

impl From<reqwest::Error> for PollError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PollError::Timeout
        } else if e.is_decode() {
            PollError::Decode {
                message: e.to_string(),
            }
        } else if let Some(status) = e.status() {
            PollError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            PollError::Transport {
                message: e.to_string(),
            }
        }
    }
}

impl XferError for PollError {
    fn error_code(&self) -> &'static str {
        match self {
            PollError::Transport { .. } => "STATUS_TRANSPORT_ERROR",
            PollError::Timeout => "STATUS_TIMEOUT",
            PollError::HttpStatus { .. } => "STATUS_HTTP_ERROR",
            PollError::Decode { .. } => "STATUS_DECODE_ERROR",
            PollError::MissingActive => "STATUS_MISSING_ACTIVE",
            PollError::ClientSetup { .. } => "HTTP_CLIENT_SETUP_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::InvalidConfiguration {
            message: "poll.interval_ms must be greater than zero".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: poll.interval_ms must be greater than zero"
        );
        assert_eq!(error.error_code(), "INVALID_CONFIGURATION");
        assert!(error.is_user_error());
    }

    #[test]
    fn test_config_not_found_is_not_user_error() {
        let error = ConfigError::ConfigNotFound {
            path: "/tmp/missing.toml".to_string(),
        };
        assert_eq!(error.error_code(), "CONFIG_NOT_FOUND");
        assert!(!error.is_user_error());
    }

    #[test]
    fn test_poll_error_classification() {
        let refused = PollError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(refused.is_transport());
        assert!(!refused.is_protocol());
        assert!(PollError::Timeout.is_transport());

        let server_error = PollError::HttpStatus { status: 500 };
        assert!(server_error.is_protocol());
        assert_eq!(server_error.to_string(), "Status endpoint returned HTTP 500");
        assert_eq!(server_error.error_code(), "STATUS_HTTP_ERROR");

        assert!(PollError::MissingActive.is_protocol());
        assert!(
            PollError::Decode {
                message: "expected value".to_string()
            }
            .is_protocol()
        );
    }
}
