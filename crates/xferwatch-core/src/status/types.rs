use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::PollError;

/// Direction of a transfer as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferKind {
    Send,
    Receive,
}

impl std::fmt::Display for TransferKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferKind::Send => write!(f, "send"),
            TransferKind::Receive => write!(f, "receive"),
        }
    }
}

/// Body of the status resource.
///
/// Only `active` is required. The remaining fields describe the transfer for
/// display and are filled with defaults when absent or malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferStatus {
    pub active: bool,

    #[serde(rename = "type", default)]
    pub kind: Option<TransferKind>,

    #[serde(default)]
    pub progress: u8,

    #[serde(default = "default_message")]
    pub message: String,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub error: Option<String>,
}

fn default_message() -> String {
    "Ready".to_string()
}

impl TransferStatus {
    /// A status carrying only the `active` flag.
    pub fn bare(active: bool) -> Self {
        Self {
            active,
            kind: None,
            progress: 0,
            message: default_message(),
            filename: None,
            error: None,
        }
    }

    /// The transfer ended with an error reported by the server.
    pub fn is_failed(&self) -> bool {
        !self.active && self.error.is_some()
    }
}

/// Decode a status body.
///
/// Each optional field is decoded on its own; a field that is missing or has
/// the wrong type falls back to its default without affecting the others.
///
/// # Errors
///
/// - [`PollError::Decode`] if the body is not JSON.
/// - [`PollError::MissingActive`] if there is no boolean `active` field.
pub fn parse_status(body: &[u8]) -> Result<TransferStatus, PollError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| PollError::Decode {
            message: e.to_string(),
        })?;

    let active = value
        .get("active")
        .and_then(serde_json::Value::as_bool)
        .ok_or(PollError::MissingActive)?;

    let text = |key: &str| {
        value
            .get(key)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
    };

    let kind = value
        .get("type")
        .and_then(|v| TransferKind::deserialize(v).ok());
    let progress = value
        .get("progress")
        .and_then(serde_json::Value::as_u64)
        .and_then(|p| u8::try_from(p).ok());

    if value.get("progress").is_some_and(|p| !p.is_null()) && progress.is_none() {
        debug!(event = "core.status.field_ignored", field = "progress");
    }

    Ok(TransferStatus {
        active,
        kind,
        progress: progress.unwrap_or(0),
        message: text("message").unwrap_or_else(default_message),
        filename: text("filename"),
        error: text("error"),
    })
}
