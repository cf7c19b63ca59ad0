//! Upload run tracking types.
//!
//! A run accumulates every upload admitted between the idle→busy and
//! busy→idle transitions of the tracker. Its summary is distinct from
//! individual completion events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Summary of a finished upload run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRunSummary {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the first item of the run was enqueued.
    pub started_at: DateTime<Utc>,
    /// When the last uploading item settled or was removed.
    pub finished_at: DateTime<Utc>,
    /// Items admitted during the run.
    pub total: u32,
    /// Items that reached `Succeeded`.
    pub succeeded: u32,
    /// Items that reached `Failed`.
    pub failed: u32,
    /// Items removed while still uploading.
    pub cancelled: u32,
}

impl UploadRunSummary {
    /// Wall-clock duration of the run in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }

    /// True if every admitted item succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.succeeded == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_duration_and_success() {
        let started_at = Utc::now();
        let summary = UploadRunSummary {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: started_at + Duration::milliseconds(1500),
            total: 2,
            succeeded: 2,
            failed: 0,
            cancelled: 0,
        };

        assert_eq!(summary.duration_ms(), 1500);
        assert!(summary.all_succeeded());
    }
}
