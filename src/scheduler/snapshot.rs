//! Read-only view of the current run
//!
//! A [`Snapshot`] is everything a renderer needs for one frame. It is built
//! from the scheduler's state on demand and owns its data, so the caller can
//! keep it across ticks.

use super::RunStatus;
use crate::distribution::DistributionSpec;
use crate::stats::fit::FitStatistic;
use crate::stats::histogram::Histogram;
use crate::stats::Moments;
use serde::{Deserialize, Serialize};

/// Point-in-time statistics of the active (or most recent) run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: RunStatus,
    pub samples_generated: u64,
    pub samples_target: u64,
    /// Distribution of the run, `None` before any run was started
    pub distribution: Option<DistributionSpec>,
    pub histogram: Histogram,
    /// `None` until at least one sample exists
    pub moments: Option<Moments>,
    pub chi_squared: FitStatistic,
    /// Running-mean trend, downsampled for plotting
    pub mean_trend: Vec<f64>,
}

impl Snapshot {
    /// Snapshot with no run and no data
    pub fn empty() -> Self {
        Self {
            status: RunStatus::Idle,
            samples_generated: 0,
            samples_target: 0,
            distribution: None,
            histogram: Histogram::new(),
            moments: None,
            chi_squared: FitStatistic::NoData,
            mean_trend: Vec::new(),
        }
    }

    /// True when no sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.moments.is_none()
    }

    pub fn mean(&self) -> Option<f64> {
        self.moments.map(|m| m.mean)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.moments.map(|m| m.std_dev)
    }

    pub fn confidence_interval_95(&self) -> Option<f64> {
        self.moments.map(|m| m.confidence_interval_95)
    }

    /// Fraction of the sample budget completed, in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.samples_target == 0 {
            0.0
        } else {
            self.samples_generated as f64 / self.samples_target as f64
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let snap = Snapshot::empty();
        assert!(snap.is_empty());
        assert_eq!(snap.status, RunStatus::Idle);
        assert_eq!(snap.mean(), None);
        assert_eq!(snap.std_dev(), None);
        assert_eq!(snap.confidence_interval_95(), None);
        assert_eq!(snap.chi_squared, FitStatistic::NoData);
        assert_eq!(snap.progress(), 0.0);
    }

    #[test]
    fn test_snapshot_serializes_distinct_states() {
        let snap = Snapshot::empty();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["chi_squared"], "no_data");
        assert!(json["moments"].is_null());
        assert_eq!(json["status"], "idle");
    }
}
