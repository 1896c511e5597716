//! Transfer status model and the sources that fetch it.

pub mod client;
pub mod types;

pub use client::{HttpStatusSource, StatusSource};
pub use types::{TransferKind, TransferStatus, parse_status};
