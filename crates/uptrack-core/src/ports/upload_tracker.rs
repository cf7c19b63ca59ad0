//! Upload tracker port definitions.
//!
//! This port defines the public interface of the upload subsystem. It
//! abstracts away the implementation details (spawned drivers, cancellation
//! tokens, locks) behind a small async API.
//!
//! # Design
//!
//! - Only core upload domain types in signatures
//! - Two seams: [`UploadTrackerPort`] for views, [`ProgressSink`] for drivers
//! - Operations on unknown or already-terminal IDs are silent no-ops, never
//!   errors. Driver and item lifetimes are decoupled, so a driver may report
//!   for an item the view already dismissed; views rely on fire-and-forget
//!   removal.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::upload::{Outcome, PayloadRef, UploadId, UploadSnapshot};

/// Port used by views to manage uploads.
///
/// # Usage
///
/// ```ignore
/// let tracker: Arc<dyn UploadTrackerPort> = /* ... */;
///
/// // Admit a batch; each item starts its own driver
/// let ids = tracker.enqueue(vec![PayloadRef::new("contract.pdf", 1024)]).await;
///
/// // Render the latest state whenever it changes
/// let mut rx = tracker.subscribe();
/// while rx.changed().await.is_ok() {
///     render(&rx.borrow_and_update());
/// }
///
/// // Dismiss an item at any point in its lifecycle
/// tracker.remove(ids[0]).await;
/// ```
#[async_trait]
pub trait UploadTrackerPort: Send + Sync {
    /// Admit a batch of payloads.
    ///
    /// Each payload becomes a new `Uploading` item at progress 0 and gets an
    /// independent progress driver. Returns the assigned IDs in input order.
    /// An empty batch is a no-op. Never blocks on item progress.
    async fn enqueue(&self, payloads: Vec<PayloadRef>) -> Vec<UploadId>;

    /// Remove an item regardless of its state.
    ///
    /// Returns `true` if the item was tracked. Later driver reports for the
    /// same ID become no-ops.
    async fn remove(&self, id: UploadId) -> bool;

    /// Remove every tracked item at once. Returns how many were removed.
    async fn clear(&self) -> usize;

    /// Current items in insertion order.
    async fn snapshot(&self) -> UploadSnapshot;

    /// Subscribe to snapshots.
    ///
    /// The receiver always holds the latest committed snapshot.
    fn subscribe(&self) -> watch::Receiver<Arc<UploadSnapshot>>;
}

/// Port through which progress drivers report back to the tracker.
///
/// Both calls are no-ops for unknown or terminal items.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Report progress (clamped to `[0, 100]`) for an uploading item.
    async fn advance(&self, id: UploadId, progress: f64);

    /// Move an uploading item to its terminal state.
    async fn finalize(&self, id: UploadId, outcome: Outcome);
}
