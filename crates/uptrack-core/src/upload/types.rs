//! Core domain types for uploads.
//!
//! Pure data types with no I/O dependencies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bytes per megabyte used for display purposes.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Identifier assigned to an upload at enqueue time.
///
/// Identifiers come from a monotonic counter owned by the tracker and are
/// never reused while the tracker is alive. Displayed as `upload-<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadId(u64);

impl UploadId {
    /// Create an ID from its raw counter value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

/// Error returned when parsing an [`UploadId`] fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid upload id: {0}")]
pub struct ParseUploadIdError(String);

impl FromStr for UploadId {
    type Err = ParseUploadIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("upload-").unwrap_or(s);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| ParseUploadIdError(s.to_string()))
    }
}

/// Opaque reference to the submitted content.
///
/// The tracker never reads the underlying bytes; it only carries the
/// descriptor so views can label the item.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadRef {
    /// Display name (usually the file name).
    pub name: String,
    /// Size of the content in bytes.
    pub size_bytes: u64,
}

impl PayloadRef {
    /// Create a new payload reference.
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            name: name.into(),
            size_bytes,
        }
    }

    /// Size formatted in megabytes with two decimals, e.g. `"1.50 MB"`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn display_size(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / BYTES_PER_MB)
    }
}

/// Lifecycle state of an upload.
///
/// `Uploading` is initial; `Succeeded` and `Failed` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    /// Transfer in progress.
    Uploading,
    /// Completed successfully.
    Succeeded,
    /// Completed with an error.
    Failed,
}

impl UploadState {
    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Lowercase string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploading => "uploading",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome decided when an upload completes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// The upload succeeded.
    Succeeded,
    /// The upload failed with a human-readable message.
    Failed {
        /// Message shown to the user.
        message: String,
    },
}

impl Outcome {
    /// Create a failed outcome.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// The state an item enters when finalized with this outcome.
    #[must_use]
    pub const fn state(&self) -> UploadState {
        match self {
            Self::Succeeded => UploadState::Succeeded,
            Self::Failed { .. } => UploadState::Failed,
        }
    }
}

/// One submitted item under tracking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadItem {
    /// Identifier, stable for the item's lifetime.
    pub id: UploadId,
    /// Descriptor of the submitted content.
    pub payload: PayloadRef,
    /// Current lifecycle state.
    pub state: UploadState,
    /// Progress percentage in `[0, 100]`; pinned to 100 once terminal.
    pub progress: f64,
    /// Present only when `state` is `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UploadItem {
    /// Create a freshly enqueued item.
    #[must_use]
    pub const fn new(id: UploadId, payload: PayloadRef) -> Self {
        Self {
            id,
            payload,
            state: UploadState::Uploading,
            progress: 0.0,
            error_message: None,
        }
    }

    /// Check whether the item reached a terminal state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Progress rounded to the nearest whole percent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_progress(&self) -> u8 {
        self.progress.round().clamp(0.0, 100.0) as u8
    }
}
