//! Periodic driver for [`UnlockOrchestrator::on_poll_tick`].

use crate::announce::Announcer;
use crate::orchestrator::{TickOutcome, UnlockOrchestrator};
use gatelock_hardware::PinInterface;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    /// Ticks that sampled the line.
    pub ticks: u64,

    /// Ticks that ran an acknowledgement sequence.
    pub acknowledged: u64,
}

/// Samples the signal line at a fixed interval until cancelled.
///
/// Each tick is awaited before the next timer tick is taken, so ticks never
/// run concurrently. Timer ticks missed while a long acknowledgement sequence
/// runs are dropped, not queued.
#[derive(Debug)]
pub struct PollLoop<P, A> {
    orchestrator: Arc<UnlockOrchestrator<P, A>>,
    period: Duration,
}

impl<P: PinInterface, A: Announcer> PollLoop<P, A> {
    /// Create a poll loop with the given sampling period.
    pub fn new(orchestrator: Arc<UnlockOrchestrator<P, A>>, period: Duration) -> Self {
        Self {
            orchestrator,
            period,
        }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// Cancellation is observed between ticks; a tick in progress runs to
    /// completion first.
    pub async fn run(self, shutdown: CancellationToken) -> PollStats {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut stats = PollStats::default();

        info!(period = ?self.period, "Poll loop started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,
                now = ticker.tick() => {
                    match self.orchestrator.on_poll_tick(now).await {
                        TickOutcome::Idle => stats.ticks += 1,
                        TickOutcome::Acknowledged { .. } => {
                            stats.ticks += 1;
                            stats.acknowledged += 1;
                        }
                        // Ticks are awaited inline, so only another driver can cause this.
                        TickOutcome::Skipped => debug!("Tick skipped"),
                    }
                }
            }
        }

        debug!(?stats, "Poll loop counters");
        info!("Poll loop stopped");
        stats
    }
}
