//! Error types for the roster source.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Roster endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid roster source: {0}")]
    InvalidSource(String),
}

pub type Result<T> = std::result::Result<T, RosterError>;
