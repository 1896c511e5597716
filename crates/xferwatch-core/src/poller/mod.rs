//! Transfer-status polling.
//!
//! [`StatusPoller`] checks a [`StatusSource`](crate::status::StatusSource)
//! every interval while a transfer runs, then hands over to a
//! [`ReloadTrigger`] once the transfer is over.

pub mod handler;
pub mod types;

pub use handler::{StatusPoller, StopHandle};
pub use types::{PollOutcome, PollState, PollTiming, ReloadTrigger, StopReason};
