//! Tracker configuration and validation.
//!
//! Pure configuration types with no infrastructure dependencies. Adapters
//! build a [`TrackerConfig`] from their own sources (CLI flags, environment)
//! and validate it before composing the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between progress reports.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 100;

/// Default lower bound of the simulated transfer duration.
pub const DEFAULT_MIN_DURATION_MS: u64 = 2_000;

/// Default upper bound of the simulated transfer duration.
pub const DEFAULT_MAX_DURATION_MS: u64 = 5_000;

/// Default probability that a completing upload fails.
pub const DEFAULT_FAILURE_PROBABILITY: f64 = 0.2;

/// Message attached to failed uploads.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Upload failed. Please try again.";

/// Configuration for the upload engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Interval between progress reports, in milliseconds.
    pub tick_interval_ms: u64,
    /// Shortest simulated transfer, in milliseconds.
    pub min_duration_ms: u64,
    /// Longest simulated transfer, in milliseconds.
    pub max_duration_ms: u64,
    /// Probability in `[0, 1]` that an upload fails at completion.
    pub failure_probability: f64,
    /// Message attached to failed uploads.
    pub failure_message: String,
    /// Seed for the random sources; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            max_duration_ms: DEFAULT_MAX_DURATION_MS,
            failure_probability: DEFAULT_FAILURE_PROBABILITY,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
            seed: None,
        }
    }
}

impl TrackerConfig {
    /// Set the progress tick interval.
    #[must_use]
    pub const fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Set the duration range.
    #[must_use]
    pub const fn with_duration_range_ms(mut self, min: u64, max: u64) -> Self {
        self.min_duration_ms = min;
        self.max_duration_ms = max;
        self
    }

    /// Set the failure probability.
    #[must_use]
    pub const fn with_failure_probability(mut self, probability: f64) -> Self {
        self.failure_probability = probability;
        self
    }

    /// Set the failure message.
    #[must_use]
    pub fn with_failure_message(mut self, message: impl Into<String>) -> Self {
        self.failure_message = message.into();
        self
    }

    /// Set the random seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Progress tick interval as a `Duration`.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Shortest simulated transfer as a `Duration`.
    #[must_use]
    pub const fn min_duration(&self) -> Duration {
        Duration::from_millis(self.min_duration_ms)
    }

    /// Longest simulated transfer as a `Duration`.
    #[must_use]
    pub const fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Failure probability must be between 0.0 and 1.0, got {0}")]
    InvalidFailureProbability(f64),

    #[error("Tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("Minimum duration ({min_ms}ms) exceeds maximum duration ({max_ms}ms)")]
    InvalidDurationRange { min_ms: u64, max_ms: u64 },

    #[error("Failure message cannot be empty")]
    EmptyFailureMessage,
}

/// Validate a tracker configuration.
pub fn validate_config(config: &TrackerConfig) -> Result<(), ConfigError> {
    // NaN fails the range check as well
    if !(0.0..=1.0).contains(&config.failure_probability) {
        return Err(ConfigError::InvalidFailureProbability(
            config.failure_probability,
        ));
    }

    if config.tick_interval_ms == 0 {
        return Err(ConfigError::ZeroTickInterval);
    }

    if config.min_duration_ms > config.max_duration_ms {
        return Err(ConfigError::InvalidDurationRange {
            min_ms: config.min_duration_ms,
            max_ms: config.max_duration_ms,
        });
    }

    if config.failure_message.trim().is_empty() {
        return Err(ConfigError::EmptyFailureMessage);
    }

    Ok(())
}
