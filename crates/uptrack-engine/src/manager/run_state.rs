//! Upload run tracking.
//!
//! A run starts when items are enqueued while nothing is uploading, and ends
//! when the last uploading item is finalized or removed.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use uptrack_core::upload::{UploadRunSummary, UploadState};

/// Counters for the run in progress.
#[derive(Debug)]
pub(super) struct RunState {
    run_id: Uuid,
    started_at: DateTime<Utc>,
    total: u32,
    succeeded: u32,
    failed: u32,
    cancelled: u32,
}

impl RunState {
    pub(super) fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            total: 0,
            succeeded: 0,
            failed: 0,
            cancelled: 0,
        }
    }

    pub(super) const fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub(super) fn record_enqueued(&mut self, count: usize) {
        self.total = self
            .total
            .saturating_add(u32::try_from(count).unwrap_or(u32::MAX));
    }

    pub(super) const fn record_finalized(&mut self, state: UploadState) {
        match state {
            UploadState::Succeeded => self.succeeded += 1,
            UploadState::Failed => self.failed += 1,
            UploadState::Uploading => {}
        }
    }

    /// Count an item removed before it reached a terminal state.
    pub(super) const fn record_cancelled(&mut self) {
        self.cancelled += 1;
    }

    pub(super) fn finish(self) -> UploadRunSummary {
        UploadRunSummary {
            run_id: self.run_id,
            started_at: self.started_at,
            finished_at: Utc::now(),
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            cancelled: self.cancelled,
        }
    }
}
