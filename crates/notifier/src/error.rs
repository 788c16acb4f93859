//! Error types for notification delivery.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Notification endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid notification sink: {0}")]
    InvalidSink(String),
}

pub type Result<T> = std::result::Result<T, SinkError>;
