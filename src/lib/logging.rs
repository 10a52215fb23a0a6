//! Formatting and summary logging.
//!
//! Helpers for rendering counts, rates and durations consistently, an [`OperationTimer`]
//! that brackets long-running work, and a per-stage summary of a finished [`Report`].

use std::time::{Duration, Instant};

use crate::report::{Report, ReportValue};

/// Formats an integer with thousands separators.
///
/// # Examples
///
/// ```
/// use pairqc_lib::logging::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Formats a percentage with specified decimal places.
///
/// # Examples
///
/// ```
/// use pairqc_lib::logging::format_percent;
///
/// assert_eq!(format_percent(0.9543, 2), "95.43%");
/// assert_eq!(format_percent(1.0, 0), "100%");
/// ```
#[must_use]
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.decimals$}%", value * 100.0, decimals = decimals)
}

/// Formats a floating point value for reports: integers without a fraction, everything else
/// with up to four decimals.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.0}")
    } else {
        let s = format!("{value:.4}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Formats a duration in human-readable form.
///
/// # Examples
///
/// ```
/// use pairqc_lib::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_secs(45)), "45s");
/// assert_eq!(format_duration(Duration::from_secs(135)), "2m 15s");
/// assert_eq!(format_duration(Duration::from_secs(5400)), "1h 30m");
/// ```
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        let mins = secs / 60;
        let remaining_secs = secs % 60;
        if remaining_secs == 0 { format!("{mins}m") } else { format!("{mins}m {remaining_secs}s") }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 { format!("{hours}h") } else { format!("{hours}h {mins}m") }
    }
}

/// Formats a rate (items per second).
///
/// # Examples
///
/// ```
/// use pairqc_lib::logging::format_rate;
/// use std::time::Duration;
///
/// assert_eq!(format_rate(1000, Duration::from_secs(1)), "1,000 items/s");
/// assert_eq!(format_rate(30, Duration::from_secs(60)), "30.0 items/min");
/// ```
#[must_use]
pub fn format_rate(count: u64, duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 0.001 {
        return format!("{} items/s", format_count(count));
    }

    let rate = count as f64 / secs;
    if rate >= 1.0 {
        format!("{} items/s", format_count(rate as u64))
    } else {
        let items_per_min = count as f64 / (secs / 60.0);
        format!("{items_per_min:.1} items/min")
    }
}

/// Logs the counters of every stage in a report.
///
/// Tables (length and quality distributions) are only summarized by their size; the full
/// values belong in the written report.
pub fn log_report_summary(report: &Report) {
    if let (Some(parsed), Some(written)) =
        (report.metadata.count("pairs_parsed"), report.metadata.count("pairs_written"))
    {
        log::info!("Read {} pairs, wrote {} pairs", format_count(parsed), format_count(written));
        if parsed > 0 {
            log::info!("  Pairs kept: {}", format_percent(written as f64 / parsed as f64, 2));
        }
    }

    for stage in &report.stages {
        log::info!("{} '{}':", stage.processor, stage.name);
        for (key, value) in stage.output.iter() {
            match value {
                ReportValue::Count(n) => log::info!("  {key}: {}", format_count(*n)),
                ReportValue::Histogram(h) => log::debug!("  {key}: {} distinct values", h.len()),
                ReportValue::PerPosition(p) => log::debug!("  {key}: {} positions", p.len()),
                ReportValue::Series(s) => log::debug!("  {key}: {} positions", s.len()),
                other => {
                    if let Some(text) = other.as_scalar_string() {
                        log::info!("  {key}: {text}");
                    }
                }
            }
        }
    }
}

/// Operation timing and summary helper.
///
/// # Examples
///
/// ```no_run
/// use pairqc_lib::logging::OperationTimer;
///
/// let timer = OperationTimer::new("Trimming read pairs");
/// // ... do work ...
/// timer.log_completion(10_000);
/// ```
pub struct OperationTimer {
    operation: String,
    start_time: Instant,
}

impl OperationTimer {
    /// Creates a new operation timer and logs the start.
    #[must_use]
    pub fn new(operation: &str) -> Self {
        log::info!("{operation} ...");
        Self { operation: operation.to_string(), start_time: Instant::now() }
    }

    /// Logs the completion with item count and rate.
    pub fn log_completion(&self, count: u64) {
        let duration = self.start_time.elapsed();
        log::info!(
            "{} completed: {} in {} ({})",
            self.operation,
            format_count(count),
            format_duration(duration),
            format_rate(count, duration)
        );
    }
}
