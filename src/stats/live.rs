//! Live progress updates
//!
//! This module provides real-time progress display while a run is being
//! driven. Updates are taken at a configurable interval and can be shown on
//! the console or appended to a CSV time series.
//!
//! # Features
//!
//! - **Periodic updates**: Configurable interval (default 500 ms)
//! - **Console display**: Single-line carriage-return progress
//! - **CSV output**: One row per update for later analysis
//! - **Instantaneous rate**: Samples per second since the last update
//!
//! # Example
//!
//! ```no_run
//! use samplepulse::scheduler::snapshot::Snapshot;
//! use samplepulse::stats::live::LiveProgress;
//! use std::time::Duration;
//!
//! let mut live = LiveProgress::new(Duration::from_millis(500));
//!
//! let snapshot = Snapshot::empty();
//! if live.should_update() {
//!     live.update(&snapshot);
//!     live.display_console();
//! }
//! ```

use crate::scheduler::snapshot::Snapshot;
use crate::stats::fit::FitStatistic;
use crate::util::format_number;
use crate::util::time::{calculate_rate, format_rate};
use std::time::{Duration, Instant};

/// Live progress tracker
///
/// Remembers the previous update so it can report the sampling rate over the
/// last interval.
#[derive(Debug)]
pub struct LiveProgress {
    /// Update interval
    interval: Duration,

    /// Last update time
    last_update: Instant,

    /// Progress at last update
    last: LiveSample,

    /// Current progress
    current: LiveSample,

    /// Update counter
    update_count: u64,

    /// Start time (for elapsed time display)
    started: Instant,
}

/// Progress at a point in time
#[derive(Debug, Clone)]
struct LiveSample {
    timestamp: Instant,
    samples_generated: u64,
    samples_target: u64,
    mean: Option<f64>,
    std_dev: Option<f64>,
    confidence_interval_95: Option<f64>,
    chi_squared: FitStatistic,
}

impl LiveSample {
    fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            timestamp: Instant::now(),
            samples_generated: snapshot.samples_generated,
            samples_target: snapshot.samples_target,
            mean: snapshot.mean(),
            std_dev: snapshot.std_dev(),
            confidence_interval_95: snapshot.confidence_interval_95(),
            chi_squared: snapshot.chi_squared,
        }
    }

    fn zero(timestamp: Instant) -> Self {
        Self {
            timestamp,
            samples_generated: 0,
            samples_target: 0,
            mean: None,
            std_dev: None,
            confidence_interval_95: None,
            chi_squared: FitStatistic::NoData,
        }
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn csv_optional(value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format!("{:.6}", v))
}

impl LiveProgress {
    /// Create a new live progress tracker
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            last_update: now,
            last: LiveSample::zero(now),
            current: LiveSample::zero(now),
            update_count: 0,
            started: now,
        }
    }

    /// Check if the interval has elapsed since the last update
    pub fn should_update(&self) -> bool {
        self.last_update.elapsed() >= self.interval
    }

    /// Record the latest snapshot
    pub fn update(&mut self, snapshot: &Snapshot) {
        self.last = std::mem::replace(&mut self.current, LiveSample::from_snapshot(snapshot));
        self.last_update = Instant::now();
        self.update_count += 1;
    }

    /// Samples per second since the previous update
    pub fn rate(&self) -> f64 {
        let elapsed = self.current.timestamp.duration_since(self.last.timestamp);
        let delta = self
            .current
            .samples_generated
            .saturating_sub(self.last.samples_generated);
        calculate_rate(delta, elapsed)
    }

    /// Single progress line for the current update
    pub fn line(&self) -> String {
        let c = &self.current;
        let percent = if c.samples_target > 0 {
            c.samples_generated as f64 * 100.0 / c.samples_target as f64
        } else {
            0.0
        };

        let mut line = format!(
            "[{:6.1}s] {}/{} ({:5.1}%) {}/s  mean: {}",
            self.started.elapsed().as_secs_f64(),
            format_number(c.samples_generated),
            format_number(c.samples_target),
            percent,
            format_rate(self.rate()),
            format_optional(c.mean),
        );
        if let Some(ci) = c.confidence_interval_95 {
            line.push_str(&format!(" ±{:.2}", ci));
        }
        line.push_str(&format!("  sd: {}  χ²: {}", format_optional(c.std_dev), c.chi_squared));
        line
    }

    /// Display progress on the console, overwriting the previous line
    pub fn display_console(&self) {
        print!("\r{}   ", self.line());

        // Flush to ensure immediate display
        use std::io::{self, Write};
        io::stdout().flush().ok();
    }

    /// CSV header for live progress rows
    pub fn csv_header() -> String {
        "update,elapsed_sec,samples_generated,samples_target,samples_per_sec,mean,std_dev,ci95,chi_squared".to_string()
    }

    /// Current progress as a CSV row
    ///
    /// Missing statistics are written as empty fields; an unavailable
    /// chi-squared is written as `NA`.
    pub fn to_csv(&self) -> String {
        let c = &self.current;
        let chi = match c.chi_squared {
            FitStatistic::Value(v) => format!("{:.6}", v),
            FitStatistic::NotAvailable => "NA".to_string(),
            FitStatistic::NoData => String::new(),
        };
        format!(
            "{},{:.3},{},{},{:.2},{},{},{},{}",
            self.update_count,
            c.timestamp.duration_since(self.started).as_secs_f64(),
            c.samples_generated,
            c.samples_target,
            self.rate(),
            csv_optional(c.mean),
            csv_optional(c.std_dev),
            csv_optional(c.confidence_interval_95),
            chi,
        )
    }

    /// Get update count
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DistributionSpec;
    use crate::scheduler::{RunRequest, SampleScheduler, SchedulerSettings};

    fn completed_snapshot() -> Snapshot {
        let mut scheduler = SampleScheduler::new(SchedulerSettings {
            seed: Some(3),
            ..SchedulerSettings::default()
        });
        scheduler
            .start_run(RunRequest::new(200, 0, DistributionSpec::Uniform).unwrap(), 0.0)
            .unwrap();
        scheduler.tick(0.0);
        scheduler.current_snapshot()
    }

    #[test]
    fn test_live_progress_new() {
        let live = LiveProgress::new(Duration::from_secs(1));
        assert_eq!(live.update_count(), 0);
        assert_eq!(live.rate(), 0.0);
    }

    #[test]
    fn test_should_update() {
        let live = LiveProgress::new(Duration::from_millis(100));
        assert!(!live.should_update());

        std::thread::sleep(Duration::from_millis(150));
        assert!(live.should_update());
    }

    #[test]
    fn test_update() {
        let mut live = LiveProgress::new(Duration::from_secs(1));
        let snapshot = completed_snapshot();

        live.update(&snapshot);
        assert_eq!(live.update_count(), 1);
        live.update(&snapshot);
        assert_eq!(live.update_count(), 2);
    }

    #[test]
    fn test_line_for_empty_snapshot() {
        let mut live = LiveProgress::new(Duration::from_secs(1));
        live.update(&Snapshot::empty());

        let line = live.line();
        assert!(line.contains("mean: -"));
        assert!(line.contains("χ²: -"));
    }

    #[test]
    fn test_line_for_completed_run() {
        let mut live = LiveProgress::new(Duration::from_secs(1));
        live.update(&completed_snapshot());

        let line = live.line();
        assert!(line.contains("200/200"));
        assert!(line.contains("100.0%"));
        assert!(line.contains("±"));
    }

    #[test]
    fn test_csv_header() {
        let header = LiveProgress::csv_header();
        assert!(header.starts_with("update,"));
        assert!(header.contains("chi_squared"));
        assert_eq!(header.split(',').count(), 9);
    }

    #[test]
    fn test_to_csv() {
        let mut live = LiveProgress::new(Duration::from_secs(1));
        live.update(&Snapshot::empty());
        let row = live.to_csv();
        assert!(row.starts_with("1,"));
        assert_eq!(row.split(',').count(), 9);
        assert!(row.ends_with(",,,,"));

        live.update(&completed_snapshot());
        let row = live.to_csv();
        assert!(row.starts_with("2,"));
        assert!(row.contains(",200,200,"));
    }

    #[test]
    fn test_display_console() {
        let mut live = LiveProgress::new(Duration::from_secs(1));
        live.update(&completed_snapshot());

        // Should not panic
        live.display_console();
    }
}
