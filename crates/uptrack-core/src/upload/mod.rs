//! Upload domain types, events, and snapshots.
//!
//! This module contains pure data types for the upload system. No I/O,
//! timers, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Identifiers and item state (`UploadId`, `PayloadRef`, `UploadItem`)
//! - `events` - Upload events (`UploadEvent`)
//! - `snapshot` - Snapshot DTOs for views (`UploadSnapshot`, `UploadCounts`)
//! - `run` - Run completion tracking (`UploadRunSummary`)

pub mod events;
pub mod run;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use events::UploadEvent;
pub use run::UploadRunSummary;
pub use snapshot::{UploadCounts, UploadSnapshot};
pub use types::{Outcome, ParseUploadIdError, PayloadRef, UploadId, UploadItem, UploadState};
