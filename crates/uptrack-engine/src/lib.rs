//! Upload tracking engine for uptrack.
//!
//! - `tracker` - pure upload state machine (no async, no IO)
//! - `manager` - async `UploadManager` with one progress driver per item
//! - `resolver` - outcome policies (random, fixed, scripted)
//! - `duration` - simulated transfer duration policies
//! - `emitter` - channel-backed event emitter
#![deny(unused_crate_dependencies)]

// Silence unused dev-dependency warnings; these are used by tests/
#[cfg(test)]
use serde_json as _;
#[cfg(test)]
use tokio_test as _;

// Re-export core types for convenience
pub use uptrack_core::ports::{
    DurationPolicy, NoopUploadEmitter, OutcomeResolver, ProgressSink, UploadEventEmitterPort,
    UploadTrackerPort,
};
pub use uptrack_core::upload::{
    Outcome, PayloadRef, UploadEvent, UploadId, UploadItem, UploadRunSummary, UploadSnapshot,
    UploadState,
};
pub use uptrack_core::{ConfigError, TrackerConfig};

pub mod duration;
pub mod emitter;
pub mod resolver;
pub mod tracker;

mod manager;

pub use duration::{FixedDuration, UniformDuration};
pub use emitter::ChannelEmitter;
pub use manager::{
    DriverDeps, DriverExit, DriverJob, UploadManager, UploadManagerDeps, build_upload_manager,
    progress_at, run_driver,
};
pub use resolver::{FixedOutcomeResolver, RandomOutcomeResolver, ScriptedOutcomeResolver};
pub use tracker::UploadTracker;
