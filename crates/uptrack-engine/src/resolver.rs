//! Outcome resolution policies.
//!
//! A resolver is consulted exactly once per item, when its progress driver
//! reaches the sampled duration.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uptrack_core::ports::OutcomeResolver;
use uptrack_core::upload::{Outcome, PayloadRef, UploadId};
use uptrack_core::{DEFAULT_FAILURE_MESSAGE, DEFAULT_FAILURE_PROBABILITY, TrackerConfig};

/// Fails each upload independently with a fixed probability.
#[derive(Debug)]
pub struct RandomOutcomeResolver {
    failure_probability: f64,
    failure_message: String,
    rng: Mutex<StdRng>,
}

impl RandomOutcomeResolver {
    /// Create an entropy-seeded resolver.
    ///
    /// The probability is clamped to `[0, 1]`; NaN is treated as 0.
    pub fn new(failure_probability: f64, failure_message: impl Into<String>) -> Self {
        Self::with_rng(
            failure_probability,
            failure_message.into(),
            StdRng::from_entropy(),
        )
    }

    /// Create a resolver whose sequence of outcomes is reproducible.
    pub fn seeded(failure_probability: f64, failure_message: impl Into<String>, seed: u64) -> Self {
        Self::with_rng(
            failure_probability,
            failure_message.into(),
            StdRng::seed_from_u64(seed),
        )
    }

    /// Build from the failure settings in `config`, seeding when a seed is set.
    pub fn from_config(config: &TrackerConfig) -> Self {
        let message = config.failure_message.clone();
        match config.seed {
            Some(seed) => Self::seeded(config.failure_probability, message, seed),
            None => Self::new(config.failure_probability, message),
        }
    }

    fn with_rng(failure_probability: f64, failure_message: String, rng: StdRng) -> Self {
        let failure_probability = if failure_probability.is_nan() {
            0.0
        } else {
            failure_probability.clamp(0.0, 1.0)
        };
        Self {
            failure_probability,
            failure_message,
            rng: Mutex::new(rng),
        }
    }

    /// The effective failure probability.
    pub const fn failure_probability(&self) -> f64 {
        self.failure_probability
    }
}

impl Default for RandomOutcomeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_PROBABILITY, DEFAULT_FAILURE_MESSAGE)
    }
}

impl OutcomeResolver for RandomOutcomeResolver {
    fn resolve(&self, _id: UploadId, _payload: &PayloadRef) -> Outcome {
        let roll: f64 = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .r#gen();

        if roll < self.failure_probability {
            Outcome::failed(self.failure_message.clone())
        } else {
            Outcome::Succeeded
        }
    }
}

/// Always resolves to the same outcome.
#[derive(Debug, Clone)]
pub struct FixedOutcomeResolver {
    outcome: Outcome,
}

impl FixedOutcomeResolver {
    pub const fn new(outcome: Outcome) -> Self {
        Self { outcome }
    }

    pub const fn succeeding() -> Self {
        Self::new(Outcome::Succeeded)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(Outcome::failed(message))
    }
}

impl OutcomeResolver for FixedOutcomeResolver {
    fn resolve(&self, _id: UploadId, _payload: &PayloadRef) -> Outcome {
        self.outcome.clone()
    }
}

/// Per-upload outcomes keyed by ID, with a fallback for everything else.
///
/// IDs are assigned from a counter starting at 1, so scripts can be written
/// before the items are enqueued.
#[derive(Debug, Clone)]
pub struct ScriptedOutcomeResolver {
    script: HashMap<UploadId, Outcome>,
    fallback: Outcome,
}

impl ScriptedOutcomeResolver {
    pub fn new(fallback: Outcome) -> Self {
        Self {
            script: HashMap::new(),
            fallback,
        }
    }

    /// Script outcomes for IDs `1..=outcomes.len()` in order.
    pub fn in_order<I>(outcomes: I, fallback: Outcome) -> Self
    where
        I: IntoIterator<Item = Outcome>,
    {
        outcomes
            .into_iter()
            .zip(1_u64..)
            .fold(Self::new(fallback), |resolver, (outcome, raw)| {
                resolver.with(UploadId::new(raw), outcome)
            })
    }

    #[must_use]
    pub fn with(mut self, id: UploadId, outcome: Outcome) -> Self {
        self.script.insert(id, outcome);
        self
    }
}

impl OutcomeResolver for ScriptedOutcomeResolver {
    fn resolve(&self, id: UploadId, _payload: &PayloadRef) -> Outcome {
        self.script
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
