//! Fixed-timestep accumulator.
//!
//! Frame times vary; the solver wants a constant `dt`. [`FixedTimestep`]
//! collects elapsed wall time and hands out whole steps. Long pauses are
//! clamped so a stalled frame does not trigger a burst of catch-up ticks.

use std::time::Duration;

/// Turns elapsed time into a count of fixed steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    leftover: Duration,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(Duration::from_millis(16))
    }
}

impl FixedTimestep {
    /// Create a clock with the given step. A zero step is raised to 1 ms.
    pub fn new(step: Duration) -> Self {
        Self {
            step: step.max(Duration::from_millis(1)),
            leftover: Duration::ZERO,
        }
    }

    /// Create a clock from a step in seconds.
    pub fn from_secs(step: f64) -> Self {
        let step = if step.is_finite() && step > 0.0 {
            Duration::from_secs_f64(step)
        } else {
            Duration::ZERO
        };
        Self::new(step)
    }

    /// The step length.
    pub fn step(&self) -> Duration {
        self.step
    }

    /// The step length in seconds.
    pub fn step_secs(&self) -> f64 {
        self.step.as_secs_f64()
    }

    /// Time carried over to the next call.
    pub fn leftover(&self) -> Duration {
        self.leftover
    }

    /// Add elapsed time and return the number of whole steps to run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.leftover += elapsed.min(self.step * 2);
        let mut steps = 0;
        while self.leftover >= self.step {
            self.leftover -= self.step;
            steps += 1;
        }
        steps
    }

    /// Drop accumulated time.
    pub fn reset(&mut self) {
        self.leftover = Duration::ZERO;
    }
}
