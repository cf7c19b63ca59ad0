//! Per-upload progress driver.
//!
//! Each enqueued item gets one driver task. The driver knows nothing about
//! the tracker or the manager's locks: it reports through the `ProgressSink`
//! port and consults the `OutcomeResolver` once at the end.
//!
//! # Design Principles
//!
//! - Driver receives a `DriverJob` (value type) and `DriverDeps` (cloned Arcs)
//! - Steps are scheduled against the start instant, so finalization lands
//!   exactly on the sampled duration
//! - Cancellation is handled via `tokio::select!` around each sleep

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use uptrack_core::ports::{OutcomeResolver, ProgressSink};
use uptrack_core::upload::{PayloadRef, UploadId};

use crate::tracker::MAX_PROGRESS;

/// Shortest accepted step; guards against a zero tick spinning forever.
const MIN_TICK: Duration = Duration::from_millis(1);

/// Dependencies shared by all drivers of one manager.
#[derive(Clone)]
pub struct DriverDeps {
    /// Where progress and the final outcome are reported.
    pub sink: Arc<dyn ProgressSink>,
    /// Decides success or failure at completion time.
    pub resolver: Arc<dyn OutcomeResolver>,
}

/// One simulated transfer to drive.
#[derive(Debug, Clone)]
pub struct DriverJob {
    pub id: UploadId,
    pub payload: PayloadRef,
    /// Total simulated transfer time.
    pub duration: Duration,
    /// Interval between progress reports.
    pub tick: Duration,
    /// Cancelled when the item is removed or the manager shuts down.
    pub cancel: CancellationToken,
}

/// How a driver ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    /// The outcome was resolved and reported.
    Finalized,
    /// The token fired before completion; nothing further was reported.
    Cancelled,
}

/// Progress percentage after `elapsed` of `duration`, capped at 100.
pub fn progress_at(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return MAX_PROGRESS;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64() * MAX_PROGRESS).min(MAX_PROGRESS)
}

/// Drive one upload to completion.
///
/// Sleeps in steps of `job.tick`, reporting progress after each intermediate
/// step. When the elapsed time reaches `job.duration` the resolver is asked
/// for an outcome and the item is finalized. A zero duration finalizes
/// immediately without any progress reports.
///
/// # Cancellation
///
/// When `job.cancel` fires, the driver returns `DriverExit::Cancelled`
/// without touching the sink again.
pub async fn run_driver(job: DriverJob, deps: &DriverDeps) -> DriverExit {
    let tick = job.tick.max(MIN_TICK);
    let start = Instant::now();
    let mut elapsed = Duration::ZERO;

    tracing::debug!(
        target: "uptrack.engine",
        id = %job.id,
        duration_ms = job.duration.as_millis(),
        "Driver started"
    );

    while elapsed < job.duration {
        let next = (elapsed + tick).min(job.duration);

        tokio::select! {
            biased;

            () = job.cancel.cancelled() => {
                tracing::debug!(target: "uptrack.engine", id = %job.id, "Driver cancelled");
                return DriverExit::Cancelled;
            }

            () = sleep_until(start + next) => {}
        }

        elapsed = next;
        if elapsed < job.duration {
            let progress = progress_at(elapsed, job.duration);
            tracing::trace!(target: "uptrack.engine", id = %job.id, progress, "Tick");
            deps.sink.advance(job.id, progress).await;
        }
    }

    if job.cancel.is_cancelled() {
        tracing::debug!(target: "uptrack.engine", id = %job.id, "Driver cancelled");
        return DriverExit::Cancelled;
    }

    let outcome = deps.resolver.resolve(job.id, &job.payload);
    deps.sink.finalize(job.id, outcome).await;

    tracing::debug!(target: "uptrack.engine", id = %job.id, "Driver finished");
    DriverExit::Finalized
}
