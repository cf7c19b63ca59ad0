//! Simulation policy ports.
//!
//! The only nondeterministic decisions in the engine (how long a transfer
//! takes, whether it succeeds) sit behind these traits so tests and adapters
//! can pin them.

use std::time::Duration;

use crate::upload::{Outcome, PayloadRef, UploadId};

/// Decides the terminal outcome of a completing upload.
///
/// Called exactly once per item, at the instant its driver completes.
pub trait OutcomeResolver: Send + Sync {
    /// Resolve the outcome for an item.
    fn resolve(&self, id: UploadId, payload: &PayloadRef) -> Outcome;
}

/// Chooses the simulated transfer duration of an upload.
///
/// Called once per item when its driver starts.
pub trait DurationPolicy: Send + Sync {
    /// Sample the duration for an item.
    fn sample(&self, id: UploadId, payload: &PayloadRef) -> Duration;
}
