//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from the engine
//! and from adapters. They contain no implementation details and use only
//! domain types.
//!
//! # Design Rules
//!
//! - No spawned tasks, cancellation tokens, or locks in any signature
//! - Randomness is always reached through a port, never called directly

pub mod simulation;
pub mod upload_event_emitter;
pub mod upload_tracker;

pub use simulation::{DurationPolicy, OutcomeResolver};
pub use upload_event_emitter::{NoopUploadEmitter, UploadEventEmitterPort};
pub use upload_tracker::{ProgressSink, UploadTrackerPort};
