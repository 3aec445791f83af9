//! Progress reporting for long relaxation runs.
//!
//! # Example
//!
//! ```
//! use amigurumi::sim::Progress;
//!
//! let progress = Progress::new(|tick, total, message| {
//!     println!("[{}/{}] {}", tick, total, message);
//! });
//! progress.report(3, 10, "relaxing");
//! ```

/// A progress callback that receives updates while the solver runs.
///
/// The callback receives:
/// - `current`: Ticks completed so far
/// - `total`: Ticks requested
/// - `message`: Description of the current phase
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str)>,
    interval: usize,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + 'static,
    {
        Self {
            callback: Box::new(callback),
            interval: 1,
        }
    }

    /// Only report every `interval` ticks (the final tick is always reported).
    pub fn with_interval(mut self, interval: usize) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Report progress unconditionally.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report a completed tick, honouring the reporting interval.
    #[inline]
    pub fn tick(&self, current: usize, total: usize, message: &str) {
        if current == total || current % self.interval == 0 {
            self.report(current, total, message);
        }
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
