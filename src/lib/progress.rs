//! Progress tracking utilities
//!
//! A thread-safe counter that logs a line each time the running total crosses a multiple of
//! its interval. Worker threads share one tracker by reference.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use log::info;

use crate::logging::{format_count, format_duration, format_rate};

/// Default number of items between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Thread-safe progress tracker for logging progress at regular intervals.
///
/// # Example
/// ```
/// use pairqc_lib::progress::ProgressTracker;
///
/// let tracker = ProgressTracker::new("Processed read pairs").with_interval(100);
/// for _ in 0..250 {
///     tracker.log_if_needed(1); // Logs at 100 and 200
/// }
/// tracker.log_final(); // Logs the total of 250
/// assert_eq!(tracker.count(), 250);
/// ```
pub struct ProgressTracker {
    message: String,
    interval: u64,
    count: AtomicU64,
    start: Instant,
}

impl ProgressTracker {
    /// Creates a tracker with the default interval.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            interval: DEFAULT_PROGRESS_INTERVAL,
            count: AtomicU64::new(0),
            start: Instant::now(),
        }
    }

    /// Sets the logging interval. An interval of zero is treated as one.
    #[must_use]
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = interval.max(1);
        self
    }

    /// Adds to the count, logging once for every interval boundary crossed.
    ///
    /// Returns true if the new count lies exactly on an interval boundary.
    pub fn log_if_needed(&self, additional: u64) -> bool {
        let prev = self.count.fetch_add(additional, Ordering::Relaxed);
        let new_count = prev + additional;

        for i in (prev / self.interval + 1)..=(new_count / self.interval) {
            let milestone = i * self.interval;
            let elapsed = self.start.elapsed();
            info!(
                "{} {} ({}, {})",
                self.message,
                format_count(milestone),
                format_duration(elapsed),
                format_rate(milestone, elapsed)
            );
        }

        new_count > 0 && new_count.is_multiple_of(self.interval)
    }

    /// Logs the final total and the elapsed time.
    pub fn log_final(&self) {
        let count = self.count();
        let elapsed = self.start.elapsed();
        info!(
            "{} {} in {} ({})",
            self.message,
            format_count(count),
            format_duration(elapsed),
            format_rate(count, elapsed)
        );
    }

    /// The current count.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
