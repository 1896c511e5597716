//! # Configuration System
//!
//! Hierarchical TOML configuration for xferwatch.
//!
//! ## Configuration Hierarchy
//!
//! Configuration is loaded in the following order (later sources override earlier ones):
//! 1. **Hardcoded defaults** - Built-in fallback values
//! 2. **User config** - `~/.xferwatch/config.toml` (global user preferences)
//! 3. **Project config** - `./.xferwatch/config.toml` (project-specific overrides)
//! 4. **CLI arguments** - Command-line flags (highest priority)
//!
//! ## Usage Example
//!
//! ```toml
//! # ~/.xferwatch/config.toml
//! [server]
//! base_url = "http://transfer-box.local:5000"
//! request_timeout_ms = 5000
//!
//! [poll]
//! interval_ms = 2000
//! reload_delay_ms = 1000
//! ```
//!
//! ## Loading Configuration
//!
//! ```rust,no_run
//! use xferwatch_core::config::WatchConfig;
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WatchConfig::load_hierarchy()?;
//!     println!("polling {}", config.status_url());
//!     Ok(())
//! }
//! ```

pub mod defaults;
pub mod loading;
pub mod types;
pub mod validation;

pub use types::{PollConfig, ServerConfig, WatchConfig};
pub use validation::validate_config;

impl WatchConfig {
    /// Load configuration from the hierarchy of config files.
    ///
    /// See [`loading::load_hierarchy`] for details.
    pub fn load_hierarchy() -> Result<Self, crate::errors::ConfigError> {
        loading::load_hierarchy()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), crate::errors::ConfigError> {
        validation::validate_config(self)
    }
}
