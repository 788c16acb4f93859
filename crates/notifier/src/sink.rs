use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use beastpush_common::types::NotificationPayload;

use crate::error::{Result, SinkError};

/// Maximum number of response body bytes kept for logging.
pub const RESPONSE_PREVIEW_BYTES: usize = 1024;

/// What the notification endpoint answered for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkResponse {
    pub status: u16,
    /// Leading slice of the response body, at most [`RESPONSE_PREVIEW_BYTES`].
    pub body: String,
}

/// Delivery target for notification payloads.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn post(&self, payload: &NotificationPayload) -> Result<SinkResponse>;
}

/// Posts payloads as JSON over HTTP with bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpNotificationSink {
    http: reqwest::Client,
    url: String,
    bearer: String,
}

impl HttpNotificationSink {
    /// Create a sink for `url`. Both `url` and `bearer` must be non-empty.
    pub fn new(
        url: impl Into<String>,
        bearer: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let url = url.into();
        let bearer = bearer.into();

        if url.trim().is_empty() {
            return Err(SinkError::InvalidSink("url is required".to_string()));
        }
        if bearer.trim().is_empty() {
            return Err(SinkError::InvalidSink("bearer is required".to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, url, bearer })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl NotificationSink for HttpNotificationSink {
    async fn post(&self, payload: &NotificationPayload) -> Result<SinkResponse> {
        let body = serde_json::to_vec(payload)?;

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.bearer)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        // The request already landed; an unreadable body only loses the preview.
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(
                    status = status.as_u16(),
                    error = %e,
                    "Failed to read notification response body"
                );
                String::new()
            }
        };
        let preview = truncate_utf8(&text, RESPONSE_PREVIEW_BYTES).to_string();

        info!(
            status = status.as_u16(),
            recipients = payload.addresses.len(),
            "Notification endpoint responded"
        );
        debug!(body = %preview, "Notification response body");

        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }

        Ok(SinkResponse {
            status: status.as_u16(),
            body: preview,
        })
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a char.
fn truncate_utf8(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_creation() {
        let sink =
            HttpNotificationSink::new("https://world.example/notify", "token", Duration::from_secs(5))
                .unwrap();
        assert_eq!(sink.url(), "https://world.example/notify");
    }

    #[test]
    fn test_sink_requires_url_and_bearer() {
        let timeout = Duration::from_secs(5);
        assert!(matches!(
            HttpNotificationSink::new("", "token", timeout),
            Err(SinkError::InvalidSink(_))
        ));
        assert!(matches!(
            HttpNotificationSink::new("https://world.example", "", timeout),
            Err(SinkError::InvalidSink(_))
        ));
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate_utf8("short", 1024), "short");
        assert_eq!(truncate_utf8("abcdef", 3), "abc");
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate_utf8("aé", 2), "a");
    }
}
