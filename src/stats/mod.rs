//! Statistics collection
//!
//! Running statistics over the outcomes of one simulation run.
//!
//! This module keeps every per-sample update O(1):
//!
//! - **Running aggregate**: count, sum and sum of squares, from which mean,
//!   population variance, standard deviation and a 95% confidence interval
//!   are derived on demand
//! - **Histogram**: one counter per outcome ([`histogram::Histogram`])
//! - **Mean series**: the running mean after every sample, for trend plots
//!
//! Goodness-of-fit ([`fit`]) and trend downsampling ([`downsample`]) read
//! from these without modifying them.
//!
//! # Example
//!
//! ```
//! use samplepulse::stats::RunningStats;
//!
//! let mut stats = RunningStats::new();
//! for v in [1, 2, 3, 4, 5] {
//!     stats.record(v);
//! }
//!
//! let m = stats.moments().unwrap();
//! assert_eq!(m.mean, 3.0);
//! assert_eq!(m.variance, 2.0);
//! ```

pub mod downsample;
pub mod fit;
pub mod histogram;
pub mod live;

use crate::error::SimError;
use histogram::Histogram;
use serde::{Deserialize, Serialize};

/// z-score for a two-sided 95% confidence interval
pub const Z_95: f64 = 1.96;

/// Summary moments derived from the running aggregate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Number of samples the moments describe
    pub count: u64,
    pub mean: f64,
    /// Population variance (denominator `count`)
    pub variance: f64,
    pub std_dev: f64,
    /// Half-width of the 95% confidence interval for the mean
    pub confidence_interval_95: f64,
}

/// Running statistics for a single run
///
/// Updated exactly once per sample and never decremented. A new run gets a
/// fresh instance; nothing is reset in place.
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    histogram: Histogram,
    means: Vec<f64>,
}

impl RunningStats {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty statistics with room for `samples` trend points
    pub fn with_capacity(samples: usize) -> Self {
        Self {
            means: Vec::with_capacity(samples),
            ..Self::default()
        }
    }

    /// Record one outcome
    #[inline]
    pub fn record(&mut self, value: u32) {
        let v = value as f64;
        self.count += 1;
        self.sum += v;
        self.sum_of_squares += v * v;
        self.histogram.record(value);
        self.means.push(self.sum / self.count as f64);
    }

    /// Number of recorded samples
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Running mean after each recorded sample
    pub fn mean_series(&self) -> &[f64] {
        &self.means
    }

    /// Derive mean, variance, standard deviation and the 95% CI half-width
    ///
    /// Returns [`SimError::NoData`] before the first sample. The naive
    /// `E[X^2] - E[X]^2` variance can dip just below zero through cancellation
    /// when all samples are equal; it is clamped to zero.
    pub fn moments(&self) -> Result<Moments, SimError> {
        if self.count == 0 {
            return Err(SimError::NoData);
        }

        let n = self.count as f64;
        let mean = self.sum / n;
        let variance = (self.sum_of_squares / n - mean * mean).max(0.0);
        let std_dev = variance.sqrt();

        Ok(Moments {
            count: self.count,
            mean,
            variance,
            std_dev,
            confidence_interval_95: Z_95 * std_dev / n.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_have_no_data() {
        let stats = RunningStats::new();
        assert_eq!(stats.count(), 0);
        assert_eq!(stats.moments(), Err(SimError::NoData));
        assert!(stats.mean_series().is_empty());
        assert_eq!(stats.histogram().total(), 0);
    }

    #[test]
    fn test_known_sequence() {
        let mut stats = RunningStats::new();
        for v in [1, 2, 3, 4, 5] {
            stats.record(v);
        }

        let m = stats.moments().unwrap();
        assert_eq!(m.count, 5);
        assert_eq!(m.mean, 3.0);
        assert_eq!(m.variance, 2.0);
        assert!((m.std_dev - 1.4142).abs() < 1e-4);
        assert!((m.confidence_interval_95 - 1.96 * 2.0f64.sqrt() / 5.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_aggregate_updates() {
        let mut stats = RunningStats::new();
        stats.record(10);
        stats.record(20);

        assert_eq!(stats.count(), 2);
        assert_eq!(stats.sum(), 30.0);
        assert_eq!(stats.sum_of_squares(), 500.0);
        assert_eq!(stats.histogram().count_of(10), 1);
        assert_eq!(stats.histogram().count_of(20), 1);
    }

    #[test]
    fn test_mean_series_tracks_running_mean() {
        let mut stats = RunningStats::with_capacity(4);
        for v in [4, 8, 6, 2] {
            stats.record(v);
        }
        assert_eq!(stats.mean_series(), &[4.0, 6.0, 6.0, 5.0]);
    }

    #[test]
    fn test_constant_samples_have_zero_variance() {
        let mut stats = RunningStats::new();
        for _ in 0..10_000 {
            stats.record(77);
        }
        let m = stats.moments().unwrap();
        assert_eq!(m.mean, 77.0);
        assert!(m.variance >= 0.0);
        assert!(m.std_dev < 1e-6);
        assert!(m.std_dev.is_finite());
    }

    #[test]
    fn test_single_sample() {
        let mut stats = RunningStats::new();
        stats.record(42);
        let m = stats.moments().unwrap();
        assert_eq!(m.mean, 42.0);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.confidence_interval_95, 0.0);
    }

    #[test]
    fn test_moments_idempotent() {
        let mut stats = RunningStats::new();
        for v in [3, 9, 27, 81] {
            stats.record(v);
        }
        assert_eq!(stats.moments(), stats.moments());
    }
}
