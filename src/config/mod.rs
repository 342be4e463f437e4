//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod toml;
pub mod validator;

use crate::distribution::DistributionSpec;
use crate::error::SimError;
use crate::scheduler::{RunRequest, SchedulerSettings, DEFAULT_PER_TICK_CAP};
use crate::stats::downsample::{DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub distribution: DistributionSpec,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Run parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of samples to draw (must be positive)
    #[serde(default = "default_samples")]
    pub samples: i64,
    /// Target time between samples in milliseconds (0 = as fast as possible)
    #[serde(default)]
    pub interval_ms: i64,
    /// RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Frame period of the driver loop in milliseconds
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    /// Cancel the run after this many milliseconds of wall-clock time
    pub stop_after_ms: Option<u64>,
    /// Switch to a new sample interval part-way through the run
    pub interval_change: Option<IntervalChange>,
}

/// One pacing change applied while a run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalChange {
    /// Wall-clock milliseconds after the start at which to switch
    pub after_ms: u64,
    /// New target time between samples in milliseconds
    pub interval_ms: i64,
}

fn default_samples() -> i64 {
    10_000
}

fn default_frame_ms() -> u64 {
    16
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            samples: default_samples(),
            interval_ms: 0,
            seed: None,
            frame_ms: default_frame_ms(),
            stop_after_ms: None,
            interval_change: None,
        }
    }
}

/// Rendering and pacing limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Target number of points in the mean trend
    #[serde(default = "default_max_plot_points")]
    pub max_plot_points: usize,
    /// Trend length above which it is downsampled
    #[serde(default = "default_downsample_threshold")]
    pub downsample_threshold: usize,
    /// Max samples generated per frame when paced
    #[serde(default = "default_per_tick_cap")]
    pub per_tick_cap: u64,
    /// Rows in the terminal histogram (outcomes are grouped per row)
    #[serde(default = "default_histogram_rows")]
    pub histogram_rows: usize,
    /// Width of the terminal histogram bars and trend chart
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
    /// Live progress refresh interval in milliseconds
    #[serde(default = "default_live_interval_ms")]
    pub live_interval_ms: u64,
}

fn default_max_plot_points() -> usize {
    DEFAULT_MAX_POINTS
}

fn default_downsample_threshold() -> usize {
    DEFAULT_THRESHOLD
}

fn default_per_tick_cap() -> u64 {
    DEFAULT_PER_TICK_CAP
}

fn default_histogram_rows() -> usize {
    20
}

fn default_chart_width() -> usize {
    60
}

fn default_live_interval_ms() -> u64 {
    500
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_plot_points: default_max_plot_points(),
            downsample_threshold: default_downsample_threshold(),
            per_tick_cap: default_per_tick_cap(),
            histogram_rows: default_histogram_rows(),
            chart_width: default_chart_width(),
            live_interval_ms: default_live_interval_ms(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report path
    pub json_output: Option<PathBuf>,
    /// Live progress CSV path (one row per live update)
    pub csv_output: Option<PathBuf>,
    /// Histogram CSV path (observed and expected count per outcome)
    pub histogram_csv: Option<PathBuf>,
    /// Disable live progress
    #[serde(default)]
    pub no_live: bool,
    /// Print the terminal histogram
    #[serde(default = "default_true")]
    pub show_histogram: bool,
    /// Print the running-mean trend chart
    #[serde(default = "default_true")]
    pub show_trend: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_output: None,
            csv_output: None,
            histogram_csv: None,
            no_live: false,
            show_histogram: true,
            show_trend: true,
        }
    }
}

impl SimConfig {
    /// Build the validated run request
    pub fn run_request(&self) -> Result<RunRequest, SimError> {
        RunRequest::new(self.run.samples, self.run.interval_ms, self.distribution)
    }

    /// Scheduler settings derived from the display and run sections
    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            per_tick_cap: self.display.per_tick_cap,
            max_plot_points: self.display.max_plot_points,
            downsample_threshold: self.display.downsample_threshold,
            seed: self.run.seed,
        }
    }
}

impl fmt::Display for SimConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Distribution:  {}", self.distribution)?;
        writeln!(f, "Samples:       {}", crate::util::format_number(self.run.samples.max(0) as u64))?;
        if self.run.interval_ms == 0 {
            writeln!(f, "Interval:      as fast as possible")?;
        } else {
            writeln!(f, "Interval:      {} ms", self.run.interval_ms)?;
        }
        if let Some(seed) = self.run.seed {
            writeln!(f, "Seed:          {}", seed)?;
        }
        if let Some(stop) = self.run.stop_after_ms {
            writeln!(f, "Stop after:    {} ms", stop)?;
        }
        if let Some(change) = self.run.interval_change {
            writeln!(f, "Retime:        {} ms interval after {} ms", change.interval_ms, change.after_ms)?;
        }
        write!(
            f,
            "Trend:         {} points (downsampled above {})",
            self.display.max_plot_points, self.display.downsample_threshold
        )
    }
}
