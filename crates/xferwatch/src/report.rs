use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use xferwatch_core::{
    HttpStatusSource, PollOutcome, ReloadTrigger, StatusSource, StopReason, TransferStatus,
};

/// Human-readable multi-line rendering of a status.
pub fn format_status(status: &TransferStatus) -> String {
    let mut lines = vec![format!(
        "{} {}",
        if status.active {
            "⏳ Transfer in progress:"
        } else if status.is_failed() {
            "❌ Transfer failed:"
        } else {
            "✅"
        },
        status.message
    )];

    if let Some(kind) = status.kind {
        lines.push(format!("   Direction: {}", kind));
    }
    if let Some(filename) = &status.filename {
        lines.push(format!("   File: {}", filename));
    }
    lines.push(format!("   Progress: {}%", status.progress));
    if let Some(error) = &status.error {
        lines.push(format!("   Error: {}", error));
    }

    lines.join("\n")
}

/// Reload for the terminal: fetch the status again and show it.
pub struct StatusReload {
    source: Arc<HttpStatusSource>,
    print: bool,
    refreshed: Mutex<Option<TransferStatus>>,
}

impl StatusReload {
    pub fn new(source: Arc<HttpStatusSource>, print: bool) -> Self {
        Self {
            source,
            print,
            refreshed: Mutex::new(None),
        }
    }

    /// Status fetched by the reload, if it ran and succeeded.
    pub fn refreshed(&self) -> Option<TransferStatus> {
        self.refreshed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ReloadTrigger for StatusReload {
    async fn reload(&self) {
        match self.source.fetch_status().await {
            Ok(status) => {
                if self.print {
                    println!("{}", format_status(&status));
                }
                *self
                    .refreshed
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(status);
            }
            Err(e) => {
                // The transfer already finished; only the refreshed view is missing.
                warn!(event = "cli.watch.reload_fetch_failed", error = %e);
                if self.print {
                    eprintln!("⚠️  Transfer finished, but the status could not be refreshed: {}", e);
                }
            }
        }
    }
}

/// JSON output of `xferwatch watch --json`.
#[derive(Debug, Serialize)]
pub struct WatchReport {
    pub outcome: &'static str,
    pub ticks: u32,
    pub reloaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransferStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl WatchReport {
    /// Build the report, preferring the status fetched by the reload.
    pub fn new(outcome: &PollOutcome, refreshed: Option<TransferStatus>) -> Self {
        let (label, status, error) = match &outcome.reason {
            StopReason::Completed(status) => (
                "completed",
                Some(refreshed.unwrap_or_else(|| status.clone())),
                None,
            ),
            StopReason::Failed(e) => ("failed", None, Some(e.to_string())),
            StopReason::Cancelled => ("cancelled", None, None),
        };

        Self {
            outcome: label,
            ticks: outcome.ticks,
            reloaded: outcome.reloaded,
            status,
            error,
            finished_at: Utc::now(),
        }
    }

    /// Report for a server that had nothing running when we looked.
    pub fn idle(status: TransferStatus) -> Self {
        Self {
            outcome: "idle",
            ticks: 0,
            reloaded: false,
            status: Some(status),
            error: None,
            finished_at: Utc::now(),
        }
    }
}
