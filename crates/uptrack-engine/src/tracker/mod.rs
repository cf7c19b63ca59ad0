//! Upload tracker state machine.
//!
//! This module provides a pure state machine for the tracked upload
//! collection. No timers or I/O are performed here; the orchestrator
//! (`UploadManager`) handles scheduling, events, and synchronization.
//!
//! # Design
//!
//! - Pure synchronous state machine (no async, no IO, no tracing)
//! - Mutations report what changed so the caller can emit events
//! - Deterministic: IDs come from a monotonic counter
//!
//! # Transitions
//!
//! ```text
//! enqueue ──▶ Uploading ──finalize──▶ Succeeded | Failed
//!                 │ advance (progress only)
//! remove / clear drop the entry from any state
//! ```
//!
//! `advance` and `finalize` on an unknown or terminal ID change nothing and
//! return `None`.

use indexmap::IndexMap;

use uptrack_core::DEFAULT_FAILURE_MESSAGE;
use uptrack_core::upload::{Outcome, PayloadRef, UploadId, UploadItem, UploadSnapshot, UploadState};

/// Upper bound of the progress scale.
pub const MAX_PROGRESS: f64 = 100.0;

/// Insertion-ordered collection of tracked uploads.
///
/// This is a sync type with no internal locking; the caller
/// (`UploadManager`) is responsible for synchronization.
#[derive(Debug)]
pub struct UploadTracker {
    items: IndexMap<UploadId, UploadItem>,
    next_id: u64,
    version: u64,
}

impl UploadTracker {
    /// Create an empty tracker. The first assigned ID is `upload-1`.
    pub fn new() -> Self {
        Self {
            items: IndexMap::new(),
            next_id: 1,
            version: 0,
        }
    }

    /// Number of committed mutations so far.
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Number of tracked items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up a tracked item.
    pub fn get(&self, id: UploadId) -> Option<&UploadItem> {
        self.items.get(&id)
    }

    /// Number of items still uploading.
    pub fn uploading_count(&self) -> usize {
        self.items.values().filter(|item| !item.is_terminal()).count()
    }

    /// Admit a batch of payloads as new `Uploading` items.
    ///
    /// Returns the created items in input order. An empty batch changes
    /// nothing (the version is not bumped).
    pub fn enqueue<I>(&mut self, payloads: I) -> Vec<UploadItem>
    where
        I: IntoIterator<Item = PayloadRef>,
    {
        let created: Vec<UploadItem> = payloads
            .into_iter()
            .map(|payload| {
                let item = UploadItem::new(self.mint_id(), payload);
                self.items.insert(item.id, item.clone());
                item
            })
            .collect();

        if !created.is_empty() {
            self.version += 1;
        }
        created
    }

    /// Report progress for an uploading item.
    ///
    /// The value is clamped to `[0, 100]`. NaN, values below the current
    /// progress, and unknown or terminal IDs are ignored. Returns the
    /// committed progress when it changed.
    pub fn advance(&mut self, id: UploadId, progress: f64) -> Option<f64> {
        if progress.is_nan() {
            return None;
        }
        let item = self.uploading_mut(id)?;
        let clamped = progress.clamp(0.0, MAX_PROGRESS);
        if clamped <= item.progress {
            return None;
        }

        item.progress = clamped;
        self.version += 1;
        Some(clamped)
    }

    /// Move an uploading item to its terminal state.
    ///
    /// Pins progress to 100 and records the error message for failures
    /// (a blank message is replaced with the default one). Returns the
    /// finalized item, or `None` for unknown or terminal IDs.
    pub fn finalize(&mut self, id: UploadId, outcome: Outcome) -> Option<UploadItem> {
        let item = self.uploading_mut(id)?;
        item.progress = MAX_PROGRESS;
        item.state = outcome.state();
        item.error_message = match outcome {
            Outcome::Succeeded => None,
            Outcome::Failed { message } if message.trim().is_empty() => {
                Some(DEFAULT_FAILURE_MESSAGE.to_string())
            }
            Outcome::Failed { message } => Some(message),
        };

        let finalized = item.clone();
        self.version += 1;
        Some(finalized)
    }

    /// Remove an item regardless of its state, preserving the order of the
    /// remaining items.
    pub fn remove(&mut self, id: UploadId) -> Option<UploadItem> {
        let removed = self.items.shift_remove(&id)?;
        self.version += 1;
        Some(removed)
    }

    /// Remove every tracked item. Returns them in insertion order.
    pub fn clear(&mut self) -> Vec<UploadItem> {
        if self.items.is_empty() {
            return Vec::new();
        }
        self.version += 1;
        self.items.drain(..).map(|(_, item)| item).collect()
    }

    /// Current items in insertion order.
    pub fn snapshot(&self) -> Vec<UploadItem> {
        self.items.values().cloned().collect()
    }

    /// Current items together with the version they reflect.
    pub fn to_snapshot(&self) -> UploadSnapshot {
        UploadSnapshot::new(self.version, self.snapshot())
    }

    fn mint_id(&mut self) -> UploadId {
        let id = UploadId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn uploading_mut(&mut self, id: UploadId) -> Option<&mut UploadItem> {
        self.items
            .get_mut(&id)
            .filter(|item| item.state == UploadState::Uploading)
    }
}

impl Default for UploadTracker {
    fn default() -> Self {
        Self::new()
    }
}
