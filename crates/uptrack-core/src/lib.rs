//! Core domain types and port definitions for uptrack.
//!
//! `uptrack-core` holds everything the upload engine and its adapters share:
//!
//! - `upload` - items, states, events, snapshots, run summaries
//! - `ports` - tracker, progress sink, simulation policy, and event emitter traits
//! - `settings` - engine configuration and validation
//!
//! Nothing in this crate spawns tasks or touches the filesystem.
#![deny(unused_crate_dependencies)]

pub mod ports;
pub mod settings;
pub mod upload;

// Re-export commonly used types for convenience
pub use ports::{
    DurationPolicy, NoopUploadEmitter, OutcomeResolver, ProgressSink, UploadEventEmitterPort,
    UploadTrackerPort,
};
pub use settings::{
    ConfigError, DEFAULT_FAILURE_MESSAGE, DEFAULT_FAILURE_PROBABILITY, DEFAULT_MAX_DURATION_MS,
    DEFAULT_MIN_DURATION_MS, DEFAULT_TICK_INTERVAL_MS, TrackerConfig, validate_config,
};
pub use upload::{
    Outcome, ParseUploadIdError, PayloadRef, UploadCounts, UploadEvent, UploadId, UploadItem,
    UploadRunSummary, UploadSnapshot, UploadState,
};
