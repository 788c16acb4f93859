//! Failure modes of a notification cycle.

use thiserror::Error;

use beastpush_common::error::AppError;
use beastpush_notifier::SinkError;
use beastpush_roster::RosterError;

#[derive(Debug, Error)]
pub enum CycleError {
    /// A required configuration value is missing. Nothing was fetched or sent.
    #[error("{0}")]
    Config(#[from] AppError),

    /// The roster could not be downloaded.
    #[error("Roster fetch failed: {0}")]
    SourceFetch(#[source] RosterError),

    /// The roster downloaded but is unusable (unparseable, or no columns).
    #[error("Roster data error: {0}")]
    DataShape(String),

    /// Posting a batch failed. Earlier batches stay delivered; later ones were skipped.
    #[error("Notification batch {batch} of {total} failed: {source}")]
    SinkPost {
        batch: usize,
        total: usize,
        #[source]
        source: SinkError,
    },
}

impl From<RosterError> for CycleError {
    fn from(err: RosterError) -> Self {
        match err {
            RosterError::Csv(e) => CycleError::DataShape(e.to_string()),
            other => CycleError::SourceFetch(other),
        }
    }
}
