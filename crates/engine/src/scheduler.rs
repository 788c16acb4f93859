//! Periodic cycle scheduler.
//!
//! Runs one cycle immediately on start, then one per interval, until a stop
//! signal arrives. The scheduler holds the only `&mut` to the runner, so at
//! most one cycle is ever in flight. A tick that elapses while a cycle is still
//! running is queued: the next cycle starts as soon as the current one
//! finishes, and later ticks are spaced a full interval from that start
//! (`MissedTickBehavior::Delay`). Missed ticks never burst.
//!
//! The stop signal is only observed between cycles; a running cycle always
//! finishes or fails on its own.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use crate::cycle::CycleRunner;

pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Drive `runner` until `shutdown` yields a message or its sender is dropped.
    ///
    /// Returns the number of cycles started. Cycle failures are logged and
    /// never stop the loop.
    pub async fn run<C: CycleRunner>(
        &self,
        runner: &mut C,
        mut shutdown: mpsc::Receiver<()>,
    ) -> usize {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs(),
            "Notification scheduler started"
        );

        let mut cycles = 0usize;

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => {
                    info!("Scheduler received shutdown signal");
                    break;
                }

                _ = ticker.tick() => {
                    cycles += 1;
                    if cycles > 1 {
                        info!(cycle = cycles, "Scheduled notification cycle triggered");
                    }

                    match runner.run_cycle().await {
                        Ok(summary) => info!(
                            run_id = %summary.run_id,
                            batches = summary.batches_sent,
                            accepted = summary.addresses_accepted,
                            "Cycle finished"
                        ),
                        Err(e) => error!(error = %e, "Cycle failed"),
                    }
                }
            }
        }

        info!(cycles, "Notification scheduler stopped");
        cycles
    }
}
