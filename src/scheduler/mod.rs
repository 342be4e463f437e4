//! Time-paced sample scheduling
//!
//! The scheduler owns the active run and decides, on every externally driven
//! tick, how many samples to generate so that output keeps pace with a target
//! interval between samples.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──start_run──▶ Running ──target reached──▶ Completed
//!                        │
//!                        └──────cancel()────────▶ Cancelled
//! ```
//!
//! At most one run is active. Starting from `Completed` or `Cancelled`
//! replaces the previous run's state with a fresh record.
//!
//! # Pacing
//!
//! With an interval of 0 ms the whole remaining budget is generated on the
//! next tick. Otherwise `floor(elapsed / interval)` samples should exist by
//! now; a tick generates the shortfall, capped at `per_tick_cap` so a driver
//! that stalled never pays for the backlog in a single frame.
//!
//! The core has no clock of its own. Callers pass a monotonic timestamp in
//! milliseconds to [`SampleScheduler::start_run`] and
//! [`SampleScheduler::tick`].
//!
//! # Example
//!
//! ```
//! use samplepulse::distribution::DistributionSpec;
//! use samplepulse::scheduler::{RunRequest, RunStatus, SampleScheduler, SchedulerSettings};
//!
//! let mut scheduler = SampleScheduler::new(SchedulerSettings::default());
//! let request = RunRequest::new(1000, 10, DistributionSpec::Uniform).unwrap();
//! scheduler.start_run(request, 0.0).unwrap();
//!
//! assert_eq!(scheduler.tick(55.0), 5);
//! assert_eq!(scheduler.status(), RunStatus::Running);
//! ```

pub mod snapshot;

use crate::distribution::{DistributionSampler, DistributionSpec};
use crate::error::SimError;
use crate::stats::downsample::{downsample, DEFAULT_MAX_POINTS, DEFAULT_THRESHOLD};
use crate::stats::fit::goodness_of_fit;
use crate::stats::RunningStats;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use snapshot::Snapshot;
use std::fmt;

/// Default ceiling on samples generated per tick when pacing is active
pub const DEFAULT_PER_TICK_CAP: u64 = 100;

/// Trend points preallocated up front; longer runs grow on demand
const MAX_PREALLOCATED_SAMPLES: u64 = 1 << 20;

/// Run lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Idle => write!(f, "idle"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Validated parameters for starting a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunRequest {
    samples_target: u64,
    interval_millis: u64,
    distribution: DistributionSpec,
}

impl RunRequest {
    /// Validate run parameters
    ///
    /// Rejects a non-positive sample target, a negative interval and invalid
    /// distribution parameters with [`SimError::InvalidParameter`].
    pub fn new(samples_target: i64, interval_millis: i64, distribution: DistributionSpec) -> Result<Self, SimError> {
        if samples_target <= 0 {
            return Err(SimError::invalid(format!(
                "samples target must be positive, got {}",
                samples_target
            )));
        }
        if interval_millis < 0 {
            return Err(SimError::invalid(format!(
                "interval must be non-negative, got {} ms",
                interval_millis
            )));
        }
        distribution.validate()?;

        Ok(Self {
            samples_target: samples_target as u64,
            interval_millis: interval_millis as u64,
            distribution,
        })
    }

    pub fn samples_target(&self) -> u64 {
        self.samples_target
    }

    pub fn interval_millis(&self) -> u64 {
        self.interval_millis
    }

    pub fn distribution(&self) -> &DistributionSpec {
        &self.distribution
    }
}

/// Scheduler tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Max samples per tick when the interval is non-zero
    pub per_tick_cap: u64,
    /// Target number of trend points in snapshots
    pub max_plot_points: usize,
    /// Trend length above which snapshots downsample
    pub downsample_threshold: usize,
    /// Seed for the sampler; random when `None`
    pub seed: Option<u64>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            per_tick_cap: DEFAULT_PER_TICK_CAP,
            max_plot_points: DEFAULT_MAX_POINTS,
            downsample_threshold: DEFAULT_THRESHOLD,
            seed: None,
        }
    }
}

/// State exclusively owned by one run
#[derive(Debug, Clone)]
pub struct RunState {
    status: RunStatus,
    samples_generated: u64,
    samples_target: u64,
    interval_millis: u64,
    start_millis: f64,
    distribution: DistributionSpec,
    stats: RunningStats,
}

impl RunState {
    fn new(request: RunRequest, now_millis: f64) -> Self {
        let capacity = request.samples_target.min(MAX_PREALLOCATED_SAMPLES) as usize;
        Self {
            status: RunStatus::Running,
            samples_generated: 0,
            samples_target: request.samples_target,
            interval_millis: request.interval_millis,
            start_millis: now_millis,
            distribution: request.distribution,
            stats: RunningStats::with_capacity(capacity),
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn samples_generated(&self) -> u64 {
        self.samples_generated
    }

    pub fn samples_target(&self) -> u64 {
        self.samples_target
    }

    pub fn interval_millis(&self) -> u64 {
        self.interval_millis
    }

    pub fn distribution(&self) -> &DistributionSpec {
        &self.distribution
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }
}

/// Drives runs from 0 to their sample target
pub struct SampleScheduler {
    settings: SchedulerSettings,
    sampler: DistributionSampler,
    run: Option<RunState>,
}

impl SampleScheduler {
    /// Create an idle scheduler
    pub fn new(settings: SchedulerSettings) -> Self {
        let sampler = match settings.seed {
            Some(seed) => DistributionSampler::with_seed(seed),
            None => DistributionSampler::new(),
        };
        Self {
            settings,
            sampler,
            run: None,
        }
    }

    /// Current lifecycle state
    pub fn status(&self) -> RunStatus {
        self.run.as_ref().map_or(RunStatus::Idle, |r| r.status)
    }

    /// True while a run is in progress
    pub fn is_running(&self) -> bool {
        self.status() == RunStatus::Running
    }

    /// The active or most recent run
    pub fn run_state(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Start a new run at `now_millis`
    ///
    /// Fails with [`SimError::AlreadyRunning`] while another run is active;
    /// that run is left untouched. The previous run's state is discarded only
    /// once the new run is accepted.
    pub fn start_run(&mut self, request: RunRequest, now_millis: f64) -> Result<(), SimError> {
        if self.is_running() {
            warn!("Ignoring start request: a run is already in progress");
            return Err(SimError::AlreadyRunning);
        }

        info!(
            "Starting run: {} samples, {} ms interval, {}",
            request.samples_target, request.interval_millis, request.distribution
        );
        self.run = Some(RunState::new(request, now_millis));
        Ok(())
    }

    /// Advance the active run to `now_millis`
    ///
    /// Returns the number of samples generated by this tick. No-op unless a
    /// run is `Running`.
    pub fn tick(&mut self, now_millis: f64) -> u64 {
        let per_tick_cap = self.settings.per_tick_cap;
        let sampler = &mut self.sampler;
        let run = match self.run.as_mut() {
            Some(run) if run.status == RunStatus::Running => run,
            _ => return 0,
        };

        let remaining = run.samples_target - run.samples_generated;
        let (desired, ceiling) = if run.interval_millis == 0 {
            (run.samples_target, remaining)
        } else {
            // f64::max drops NaN, so a bogus clock reads as no elapsed time
            let elapsed = (now_millis - run.start_millis).max(0.0);
            let desired = (elapsed / run.interval_millis as f64).floor() as u64;
            (desired, per_tick_cap)
        };

        let batch = desired
            .saturating_sub(run.samples_generated)
            .min(ceiling)
            .min(remaining);

        for _ in 0..batch {
            let value = sampler.draw(&run.distribution);
            run.stats.record(value);
            run.samples_generated += 1;
        }

        if run.samples_generated >= run.samples_target {
            run.status = RunStatus::Completed;
            info!("Run completed: {} samples", run.samples_generated);
        } else if batch > 0 {
            debug!(
                "Tick generated {} samples ({}/{})",
                batch, run.samples_generated, run.samples_target
            );
        }

        batch
    }

    /// Change the pacing of the active run
    ///
    /// The target count is recomputed from the run start with the new
    /// interval; samples already generated are never taken back.
    pub fn set_interval(&mut self, interval_millis: i64) -> Result<(), SimError> {
        if interval_millis < 0 {
            return Err(SimError::invalid(format!(
                "interval must be non-negative, got {} ms",
                interval_millis
            )));
        }
        if let Some(run) = self.run.as_mut().filter(|r| r.status == RunStatus::Running) {
            debug!("Interval changed: {} ms -> {} ms", run.interval_millis, interval_millis);
            run.interval_millis = interval_millis as u64;
        }
        Ok(())
    }

    /// Stop the active run immediately
    ///
    /// Pending catch-up work is dropped; recorded statistics stay queryable.
    /// Returns false when no run was in progress.
    pub fn cancel(&mut self) -> bool {
        match self.run.as_mut() {
            Some(run) if run.status == RunStatus::Running => {
                run.status = RunStatus::Cancelled;
                info!(
                    "Run cancelled after {}/{} samples",
                    run.samples_generated, run.samples_target
                );
                true
            }
            _ => false,
        }
    }

    /// Statistics of the active or most recent run
    ///
    /// Safe to call at any time; returns [`Snapshot::empty`] before the first
    /// run. Calling it twice without an intervening tick yields identical
    /// snapshots.
    pub fn current_snapshot(&self) -> Snapshot {
        let Some(run) = self.run.as_ref() else {
            return Snapshot::empty();
        };

        let stats = &run.stats;
        Snapshot {
            status: run.status,
            samples_generated: run.samples_generated,
            samples_target: run.samples_target,
            distribution: Some(run.distribution),
            histogram: stats.histogram().clone(),
            moments: stats.moments().ok(),
            chi_squared: goodness_of_fit(&run.distribution, stats.histogram()),
            mean_trend: downsample(
                stats.mean_series(),
                self.settings.max_plot_points,
                self.settings.downsample_threshold,
            ),
        }
    }
}
