//! Upload event emitter port.
//!
//! This port abstracts upload event emission, allowing the engine to emit
//! events without coupling to transport details (channels, terminals, etc.).

use crate::upload::UploadEvent;

/// Port for emitting upload events.
///
/// Implementations handle the actual event delivery.
pub trait UploadEventEmitterPort: Send + Sync {
    /// Emit an upload event.
    ///
    /// Called while the tracker commits a mutation, so this method must not
    /// block.
    fn emit(&self, event: UploadEvent);

    /// Clone this emitter into a boxed trait object.
    ///
    /// This enables cloning of `Arc<dyn UploadEventEmitterPort>` without
    /// requiring the underlying type to implement Clone.
    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort>;
}

/// A no-op upload event emitter for tests and snapshot-only views.
#[derive(Debug, Clone, Default)]
pub struct NoopUploadEmitter;

impl NoopUploadEmitter {
    /// Create a new no-op upload emitter.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl UploadEventEmitterPort for NoopUploadEmitter {
    fn emit(&self, _event: UploadEvent) {
        // Intentionally do nothing
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::upload::UploadId;

    #[test]
    fn test_noop_emitter() {
        let emitter = NoopUploadEmitter::new();

        // Should not panic
        emitter.emit(UploadEvent::UploadSucceeded {
            id: UploadId::new(1),
        });
        let _boxed: Box<dyn UploadEventEmitterPort> = emitter.clone_box();
    }

    #[test]
    fn test_emitter_as_trait_object_captures_events() {
        #[derive(Clone, Default)]
        struct Capture {
            events: Arc<Mutex<Vec<UploadEvent>>>,
        }

        impl UploadEventEmitterPort for Capture {
            fn emit(&self, event: UploadEvent) {
                self.events.lock().unwrap().push(event);
            }

            fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
                Box::new(self.clone())
            }
        }

        let capture = Capture::default();
        let emitter: Arc<dyn UploadEventEmitterPort> = Arc::new(capture.clone());
        let cloned = emitter.clone_box();

        emitter.emit(UploadEvent::UploadRemoved {
            id: UploadId::new(1),
        });
        cloned.emit(UploadEvent::UploadsCleared { removed: 0 });

        let events = capture.events.lock().unwrap();
        assert_eq!(events.len(), 2, "clones share the same sink");
        assert_eq!(events[0].event_name(), "upload:removed");
    }
}
