//! Notification cycle orchestrator.
//!
//! One cycle:
//! 1. Re-validate configuration (before any network call)
//! 2. Fetch the roster and require at least one column
//! 3. Take the first column, by position, as raw roster entries
//! 4. Normalize entries into wallet addresses (rejects are dropped)
//! 5. Partition addresses into batches
//! 6. For each batch, in order: draw a message, build the payload, post it
//!
//! Batches are posted strictly one after another. The first failed post ends
//! the cycle; batches already posted are not rolled back or retried.

use std::num::NonZeroUsize;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use beastpush_common::config::AppConfig;
use beastpush_common::types::{CycleSummary, NotificationPayload, WalletAddress};
use beastpush_notifier::NotificationSink;
use beastpush_roster::RosterSource;

use crate::batcher::{BATCH_SIZE, batch};
use crate::catalog::{MessageCatalog, MessageSelector, RandomSelector};
use crate::error::CycleError;
use crate::normalizer::normalize_all;

/// Anything the scheduler can run once per tick.
#[async_trait]
pub trait CycleRunner: Send {
    async fn run_cycle(&mut self) -> Result<CycleSummary, CycleError>;
}

/// Fixed, read-only inputs of every cycle.
#[derive(Debug, Clone)]
pub struct CycleSettings {
    /// Maximum recipients per notification request
    pub batch_size: NonZeroUsize,
    pub catalog: MessageCatalog,
}

impl Default for CycleSettings {
    fn default() -> Self {
        Self {
            batch_size: BATCH_SIZE,
            catalog: MessageCatalog::default(),
        }
    }
}

/// Runs fetch → normalize → batch → dispatch against one source and one sink.
pub struct NotificationCycle<R, S> {
    config: AppConfig,
    settings: CycleSettings,
    source: R,
    sink: S,
    selector: Box<dyn MessageSelector>,
}

impl<R, S> NotificationCycle<R, S>
where
    R: RosterSource,
    S: NotificationSink,
{
    pub fn new(config: AppConfig, source: R, sink: S) -> Self {
        Self {
            config,
            settings: CycleSettings::default(),
            source,
            sink,
            selector: Box::new(RandomSelector::from_entropy()),
        }
    }

    pub fn with_settings(mut self, settings: CycleSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the random message selector (e.g. with a seeded one).
    pub fn with_selector(mut self, selector: impl MessageSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn settings(&self) -> &CycleSettings {
        &self.settings
    }

    /// Build the payload for one batch, drawing a fresh message for it.
    pub fn build_payload(&mut self, addresses: Vec<WalletAddress>) -> NotificationPayload {
        let message = self.settings.catalog.pick(&mut *self.selector);
        NotificationPayload::new(
            self.config.app_id.clone(),
            addresses,
            message.title.clone(),
            message.body.clone(),
        )
    }

    async fn execute(&mut self, run_id: Uuid) -> Result<CycleSummary, CycleError> {
        let started_at = Utc::now();
        info!("Starting notification cycle");

        self.config.validate()?;

        let table = self.source.fetch().await?;
        let entries = table.first_column().ok_or_else(|| {
            CycleError::DataShape(format!(
                "roster must have at least 1 column, but found {}",
                table.column_count()
            ))
        })?;

        let normalized = normalize_all(&entries);
        info!(
            entries = entries.len(),
            accepted = normalized.addresses.len(),
            discarded = normalized.discarded,
            "Normalized roster entries"
        );

        let accepted = normalized.addresses.len();
        let batches = batch(normalized.addresses, self.settings.batch_size);
        let total = batches.len();

        for (index, addresses) in batches.into_iter().enumerate() {
            let number = index + 1;
            let payload = self.build_payload(addresses);

            info!(
                batch = number,
                total,
                batch_size = payload.addresses.len(),
                title = %payload.title,
                "Posting notification batch"
            );

            let response = self
                .sink
                .post(&payload)
                .await
                .map_err(|source| CycleError::SinkPost {
                    batch: number,
                    total,
                    source,
                })?;

            info!(batch = number, status = response.status, "Batch delivered");
        }

        let summary = CycleSummary {
            run_id,
            started_at,
            entries_read: entries.len(),
            addresses_accepted: accepted,
            entries_discarded: normalized.discarded,
            batches_sent: total,
        };

        info!(batches = total, "Notification cycle completed");
        Ok(summary)
    }
}

#[async_trait]
impl<R, S> CycleRunner for NotificationCycle<R, S>
where
    R: RosterSource,
    S: NotificationSink,
{
    async fn run_cycle(&mut self) -> Result<CycleSummary, CycleError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("cycle", %run_id);
        self.execute(run_id).instrument(span).await
    }
}
