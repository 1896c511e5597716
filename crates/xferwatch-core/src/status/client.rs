use std::future::Future;

use tracing::{debug, info, warn};

use crate::config::WatchConfig;
use crate::errors::PollError;
use crate::status::types::{TransferStatus, parse_status};

/// One outbound status request.
///
/// Implementations perform exactly one request per call and never retry.
pub trait StatusSource: Send + Sync + 'static {
    fn fetch_status(&self) -> impl Future<Output = Result<TransferStatus, PollError>> + Send;
}

/// Fetches `GET {base_url}{status_path}` over HTTP.
///
/// Redirects are not followed: the transfer server answers form posts with a
/// redirect to its index page, which carries no status.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    url: String,
    clear_url: String,
}

impl HttpStatusSource {
    /// Build a source from the resolved configuration.
    pub fn from_config(config: &WatchConfig) -> Result<Self, PollError> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| PollError::ClientSetup {
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            url: config.status_url(),
            clear_url: config.clear_url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn clear_url(&self) -> &str {
        &self.clear_url
    }

    /// Reset the server's transfer status with `POST {base_url}{clear_path}`.
    ///
    /// Success and redirect responses both count as cleared.
    pub async fn clear_status(&self) -> Result<(), PollError> {
        let response = self.client.post(&self.clear_url).send().await?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            warn!(
                event = "core.status.clear_failed",
                url = %self.clear_url,
                http_status = status.as_u16(),
            );
            return Err(PollError::HttpStatus {
                status: status.as_u16(),
            });
        }

        info!(event = "core.status.cleared", url = %self.clear_url);
        Ok(())
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch_status(&self) -> Result<TransferStatus, PollError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            let err = PollError::from(e);
            warn!(
                event = "core.status.fetch_failed",
                url = %self.url,
                error = %err,
            );
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event = "core.status.fetch_failed",
                url = %self.url,
                http_status = status.as_u16(),
            );
            return Err(PollError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let transfer = parse_status(&body)?;

        debug!(
            event = "core.status.fetch_completed",
            url = %self.url,
            active = transfer.active,
            progress = transfer.progress,
        );

        Ok(transfer)
    }
}
