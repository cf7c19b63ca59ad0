//! Progress throttling.
//!
//! Rate-limits plain progress lines so piped output stays readable.

use std::time::{Duration, Instant};

/// Rate-limiter for progress lines.
///
/// Ensures lines for one upload are not printed more frequently than the
/// configured interval.
#[derive(Debug)]
pub struct ProgressThrottle {
    last_emit: Option<Instant>,
    min_interval: Duration,
}

impl ProgressThrottle {
    /// Create a new throttle with the specified minimum interval.
    pub const fn new(min_interval: Duration) -> Self {
        Self {
            last_emit: None,
            min_interval,
        }
    }

    /// Check if enough time has passed since `now` to print again.
    pub fn should_emit_at(&mut self, now: Instant) -> bool {
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }

    /// Check if enough time has passed to print again.
    pub fn should_emit(&mut self) -> bool {
        self.should_emit_at(Instant::now())
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new(Duration::from_millis(250))
    }
}
