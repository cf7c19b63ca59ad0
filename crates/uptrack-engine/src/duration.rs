//! Simulated transfer duration policies.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use uptrack_core::ports::DurationPolicy;
use uptrack_core::upload::{PayloadRef, UploadId};
use uptrack_core::{DEFAULT_MAX_DURATION_MS, DEFAULT_MIN_DURATION_MS, TrackerConfig};

/// Draws each duration uniformly from an inclusive millisecond range.
#[derive(Debug)]
pub struct UniformDuration {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl UniformDuration {
    /// Create an entropy-seeded policy. Bounds given in reverse are swapped.
    pub fn new(min: Duration, max: Duration) -> Self {
        Self::with_rng(min, max, StdRng::from_entropy())
    }

    /// Create a policy whose sequence of durations is reproducible.
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    /// Build from the duration range in `config`.
    ///
    /// The seed is offset so a seeded run does not correlate durations with
    /// outcomes drawn from the same seed.
    pub fn from_config(config: &TrackerConfig) -> Self {
        let (min, max) = (config.min_duration(), config.max_duration());
        match config.seed {
            Some(seed) => Self::seeded(min, max, seed.wrapping_add(1)),
            None => Self::new(min, max),
        }
    }

    fn with_rng(min: Duration, max: Duration, rng: StdRng) -> Self {
        let a = duration_ms(min);
        let b = duration_ms(max);
        Self {
            min_ms: a.min(b),
            max_ms: a.max(b),
            rng: Mutex::new(rng),
        }
    }

    pub const fn bounds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.min_ms),
            Duration::from_millis(self.max_ms),
        )
    }
}

impl Default for UniformDuration {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MIN_DURATION_MS),
            Duration::from_millis(DEFAULT_MAX_DURATION_MS),
        )
    }
}

impl DurationPolicy for UniformDuration {
    fn sample(&self, _id: UploadId, _payload: &PayloadRef) -> Duration {
        if self.min_ms == self.max_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Every upload takes the same time.
#[derive(Debug, Clone, Copy)]
pub struct FixedDuration(pub Duration);

impl FixedDuration {
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }
}

impl DurationPolicy for FixedDuration {
    fn sample(&self, _id: UploadId, _payload: &PayloadRef) -> Duration {
        self.0
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_many(policy: &dyn DurationPolicy, n: u64) -> Vec<Duration> {
        let payload = PayloadRef::new("scan.pdf", 10);
        (1..=n)
            .map(|raw| policy.sample(UploadId::new(raw), &payload))
            .collect()
    }

    #[test]
    fn test_uniform_stays_within_bounds() {
        let policy = UniformDuration::seeded(
            Duration::from_millis(2_000),
            Duration::from_millis(5_000),
            99,
        );
        for d in sample_many(&policy, 500) {
            assert!(d >= Duration::from_millis(2_000) && d <= Duration::from_millis(5_000));
        }
    }

    #[test]
    fn test_uniform_seeded_is_reproducible() {
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(1_000);
        let a = UniformDuration::seeded(min, max, 5);
        let b = UniformDuration::seeded(min, max, 5);
        assert_eq!(sample_many(&a, 32), sample_many(&b, 32));
    }

    #[test]
    fn test_uniform_degenerate_range() {
        let policy = UniformDuration::new(Duration::from_millis(750), Duration::from_millis(750));
        assert!(
            sample_many(&policy, 10)
                .iter()
                .all(|d| *d == Duration::from_millis(750))
        );
    }

    #[test]
    fn test_uniform_swaps_reversed_bounds() {
        let policy = UniformDuration::new(Duration::from_millis(900), Duration::from_millis(100));
        assert_eq!(
            policy.bounds(),
            (Duration::from_millis(100), Duration::from_millis(900))
        );
    }

    #[test]
    fn test_default_range() {
        let (min, max) = UniformDuration::default().bounds();
        assert_eq!(min, Duration::from_millis(2_000));
        assert_eq!(max, Duration::from_millis(5_000));
    }

    #[test]
    fn test_fixed_duration() {
        let policy = FixedDuration::from_millis(0);
        assert!(sample_many(&policy, 3).iter().all(|d| d.is_zero()));
    }
}
