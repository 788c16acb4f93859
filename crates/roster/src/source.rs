//! Roster download client.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Result, RosterError};
use crate::table::RosterTable;

/// Anything that can produce the current roster.
#[async_trait]
pub trait RosterSource: Send + Sync {
    async fn fetch(&self) -> Result<RosterTable>;
}

/// Fetches the roster as CSV over HTTP with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpRosterSource {
    http: reqwest::Client,
    url: String,
    bearer: String,
}

impl HttpRosterSource {
    /// Create a client for `url`. Both `url` and `bearer` must be non-empty.
    pub fn new(
        url: impl Into<String>,
        bearer: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();
        let bearer = bearer.into();

        if url.trim().is_empty() {
            return Err(RosterError::InvalidSource("url is required".to_string()));
        }
        if bearer.trim().is_empty() {
            return Err(RosterError::InvalidSource("bearer is required".to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, url, bearer })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RosterSource for HttpRosterSource {
    async fn fetch(&self) -> Result<RosterTable> {
        debug!(url = %self.url, "Fetching roster");

        let response = self
            .http
            .get(&self.url)
            .bearer_auth(&self.bearer)
            .send()
            .await?;

        let status = response.status();
        info!(status = status.as_u16(), "Roster endpoint responded");

        if !status.is_success() {
            return Err(RosterError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.bytes().await?;
        let table = RosterTable::from_bytes(&body)?;

        debug!(
            columns = table.column_count(),
            rows = table.row_count(),
            "Parsed roster"
        );

        Ok(table)
    }
}
