//! Snapshot DTOs for views.
//!
//! These types are "UI safe" - Clone + Debug + Serialize + Deserialize with no
//! infrastructure dependencies. Views receive them after every committed
//! tracker mutation.

use serde::{Deserialize, Serialize};

use super::types::{UploadId, UploadItem, UploadState};

/// Point-in-time view of all tracked uploads in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadSnapshot {
    /// Incremented by one for every committed mutation.
    pub version: u64,
    /// Tracked items in insertion order.
    pub items: Vec<UploadItem>,
}

impl UploadSnapshot {
    /// Create a snapshot from a version and item list.
    #[must_use]
    pub const fn new(version: u64, items: Vec<UploadItem>) -> Self {
        Self { version, items }
    }

    /// Check if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of tracked items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get an item by its ID.
    pub fn get(&self, id: UploadId) -> Option<&UploadItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Count items per state.
    #[must_use]
    pub fn counts(&self) -> UploadCounts {
        self.items
            .iter()
            .fold(UploadCounts::default(), |mut counts, item| {
                match item.state {
                    UploadState::Uploading => counts.uploading += 1,
                    UploadState::Succeeded => counts.succeeded += 1,
                    UploadState::Failed => counts.failed += 1,
                }
                counts
            })
    }

    /// True when no tracked item is still uploading.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.items.iter().all(UploadItem::is_terminal)
    }
}

/// Per-state item counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadCounts {
    /// Items still uploading.
    pub uploading: usize,
    /// Items that succeeded.
    pub succeeded: usize,
    /// Items that failed.
    pub failed: usize,
}

impl UploadCounts {
    /// Total number of items counted.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.uploading + self.succeeded + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::types::PayloadRef;

    fn item(id: u64, state: UploadState) -> UploadItem {
        let mut item = UploadItem::new(UploadId::new(id), PayloadRef::new(format!("{id}.pdf"), 1));
        item.state = state;
        item
    }

    #[test]
    fn test_empty_snapshot_is_settled() {
        let snapshot = UploadSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.is_settled());
        assert_eq!(snapshot.counts().total(), 0);
    }

    #[test]
    fn test_counts_and_settled() {
        let snapshot = UploadSnapshot::new(
            3,
            vec![
                item(1, UploadState::Succeeded),
                item(2, UploadState::Uploading),
                item(3, UploadState::Failed),
            ],
        );

        let counts = snapshot.counts();
        assert_eq!(counts.uploading, 1);
        assert_eq!(counts.succeeded, 1);
        assert_eq!(counts.failed, 1);
        assert_eq!(counts.total(), 3);
        assert!(!snapshot.is_settled());
        assert_eq!(snapshot.get(UploadId::new(3)).map(|i| i.state), Some(UploadState::Failed));
        assert!(snapshot.get(UploadId::new(9)).is_none());
    }
}
