//! Channel-backed event emitter.

use tokio::sync::mpsc;

use uptrack_core::ports::UploadEventEmitterPort;
use uptrack_core::upload::UploadEvent;

/// Forwards upload events into an unbounded channel.
///
/// Sending never blocks, so it is safe to call while the manager holds its
/// lock. Events sent after the receiver is dropped are discarded.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: mpsc::UnboundedSender<UploadEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiver for its events.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<UploadEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl UploadEventEmitterPort for ChannelEmitter {
    fn emit(&self, event: UploadEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!(target: "uptrack.engine", "Event receiver dropped; discarding event");
        }
    }

    fn clone_box(&self) -> Box<dyn UploadEventEmitterPort> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use uptrack_core::upload::UploadId;

    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (emitter, mut rx) = ChannelEmitter::new();
        let boxed = emitter.clone_box();

        emitter.emit(UploadEvent::progress(UploadId::new(1), 10.0));
        boxed.emit(UploadEvent::UploadSucceeded {
            id: UploadId::new(1),
        });

        assert_eq!(rx.try_recv().unwrap().event_name(), "upload:progress");
        assert_eq!(rx.try_recv().unwrap().event_name(), "upload:succeeded");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_emit_after_receiver_dropped_is_harmless() {
        let (emitter, rx) = ChannelEmitter::new();
        drop(rx);
        emitter.emit(UploadEvent::UploadsCleared { removed: 1 });
    }
}
