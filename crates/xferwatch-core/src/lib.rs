//! xferwatch-core: Core library for watching file transfers
//!
//! Polls a transfer server's status resource while a transfer is in
//! progress and triggers a reload of the watching view once it ends.
//!
//! # Main Entry Points
//!
//! - [`poller`] - The status poller and its lifecycle
//! - [`status`] - Transfer status model and HTTP status source
//! - [`config`] - Configuration management

pub mod config;
pub mod errors;
pub mod events;
pub mod logging;
pub mod poller;
pub mod status;

// Re-export commonly used types at crate root for convenience
pub use config::WatchConfig;
pub use errors::{ConfigError, PollError, XferError};
pub use poller::{
    PollOutcome, PollState, PollTiming, ReloadTrigger, StatusPoller, StopHandle, StopReason,
};
pub use status::{HttpStatusSource, StatusSource, TransferKind, TransferStatus};

// Re-export logging initialization
pub use logging::init_logging;
