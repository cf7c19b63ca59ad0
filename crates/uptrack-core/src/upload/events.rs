//! Upload events - discriminated union for all tracker state changes.

use serde::{Deserialize, Serialize};

use super::run::UploadRunSummary;
use super::types::{PayloadRef, UploadId};

/// Single discriminated union for all upload events.
///
/// Serialized with a `type` tag so adapters can forward it verbatim:
///
/// ```json
/// { "type": "upload_progress", "id": 3, "progress": 42.0 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UploadEvent {
    /// An item was admitted to the tracker.
    UploadQueued {
        /// ID assigned to the item.
        id: UploadId,
        /// Display name of the payload.
        name: String,
        /// Payload size in bytes.
        size_bytes: u64,
    },

    /// Progress was committed for an uploading item.
    UploadProgress {
        /// ID of the item.
        id: UploadId,
        /// New progress percentage (0.0 - 100.0).
        progress: f64,
    },

    /// An item finished successfully.
    UploadSucceeded {
        /// ID of the item.
        id: UploadId,
    },

    /// An item finished with an error.
    UploadFailed {
        /// ID of the item.
        id: UploadId,
        /// Message describing what went wrong.
        error: String,
    },

    /// An item was removed from tracking.
    UploadRemoved {
        /// ID of the removed item.
        id: UploadId,
    },

    /// Every tracked item was removed at once.
    UploadsCleared {
        /// Number of items removed.
        removed: usize,
    },

    /// The tracker went from busy to idle.
    RunComplete {
        /// Summary of the finished run.
        summary: UploadRunSummary,
    },
}

impl UploadEvent {
    /// Create a queued event from a payload.
    #[must_use]
    pub fn queued(id: UploadId, payload: &PayloadRef) -> Self {
        Self::UploadQueued {
            id,
            name: payload.name.clone(),
            size_bytes: payload.size_bytes,
        }
    }

    /// Create a progress event.
    #[must_use]
    pub const fn progress(id: UploadId, progress: f64) -> Self {
        Self::UploadProgress { id, progress }
    }

    /// Create a failed event.
    pub fn failed(id: UploadId, error: impl Into<String>) -> Self {
        Self::UploadFailed {
            id,
            error: error.into(),
        }
    }

    /// Get the upload ID from any per-item event.
    #[must_use]
    pub const fn id(&self) -> Option<UploadId> {
        match self {
            Self::UploadsCleared { .. } | Self::RunComplete { .. } => None,
            Self::UploadQueued { id, .. }
            | Self::UploadProgress { id, .. }
            | Self::UploadSucceeded { id }
            | Self::UploadFailed { id, .. }
            | Self::UploadRemoved { id } => Some(*id),
        }
    }

    /// Get the event name for wire protocols.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::UploadQueued { .. } => "upload:queued",
            Self::UploadProgress { .. } => "upload:progress",
            Self::UploadSucceeded { .. } => "upload:succeeded",
            Self::UploadFailed { .. } => "upload:failed",
            Self::UploadRemoved { .. } => "upload:removed",
            Self::UploadsCleared { .. } => "upload:cleared",
            Self::RunComplete { .. } => "upload:run_complete",
        }
    }
}
