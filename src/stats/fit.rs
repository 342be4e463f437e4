//! Goodness-of-fit against the sampled distribution
//!
//! Computes the expected count in each of the 100 outcome bins for the
//! distribution a run samples from, and Pearson's chi-squared statistic of the
//! observed histogram against those expectations.
//!
//! # Truncated support
//!
//! Every family is evaluated only at the integers 1..=100 and renormalized
//! over those bins. Mass the sampler folds into the boundary bins by clamping
//! is not modelled, so heavily clamped runs show inflated statistics at the
//! edges.
//!
//! # Numerics
//!
//! Binomial and Poisson probabilities are built in log space (running log
//! binomial coefficient, running log factorial) so large `n` or `lambda` never
//! overflow. All families subtract the largest log weight before
//! exponentiating, which keeps at least one bin at weight 1.
//!
//! # Example
//!
//! ```
//! use samplepulse::distribution::DistributionSpec;
//! use samplepulse::stats::fit::{chi_squared, expected_frequencies, FitStatistic};
//! use samplepulse::stats::histogram::Histogram;
//!
//! let expected = expected_frequencies(&DistributionSpec::Uniform, 1000).unwrap();
//! assert_eq!(expected.as_slice()[0], 10.0);
//!
//! let observed = Histogram::from_counts([10; 100]);
//! assert_eq!(chi_squared(observed.counts(), expected.as_slice()), FitStatistic::Value(0.0));
//! ```

use crate::distribution::{DistributionSpec, MAX_OUTCOME, MIN_OUTCOME, NUM_BINS};
use crate::error::SimError;
use crate::stats::histogram::Histogram;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Bins with an expected count below this are left out of the statistic
pub const MIN_EXPECTED_FREQUENCY: f64 = 1e-8;

/// Expected sample count per outcome bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedFrequencies {
    values: Vec<f64>,
}

impl ExpectedFrequencies {
    /// Wrap explicit per-bin expectations
    pub fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Sum of all expectations (approximately the sample count)
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// Result of a chi-squared evaluation
///
/// `NoData` and `NotAvailable` are distinct from every numeric value and must
/// be rendered as such.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStatistic {
    /// No samples have been recorded
    NoData,
    /// The statistic is not a finite number
    NotAvailable,
    /// Pearson's chi-squared statistic
    Value(f64),
}

impl FitStatistic {
    /// Numeric value, if there is one
    pub fn value(&self) -> Option<f64> {
        match self {
            FitStatistic::Value(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FitStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitStatistic::NoData => write!(f, "-"),
            FitStatistic::NotAvailable => write!(f, "N/A"),
            FitStatistic::Value(v) => write!(f, "{:.2}", v),
        }
    }
}

/// `x * ln(y)` with the convention `0 * ln(0) = 0`
#[inline]
fn xlny(x: f64, y: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x * y.ln()
    }
}

/// Outcome closest to `x` on the 1..=100 support
fn nearest_outcome(x: f64) -> u32 {
    x.round().clamp(MIN_OUTCOME as f64, MAX_OUTCOME as f64) as u32
}

/// Unnormalized log-probability of each outcome 1..=100
fn log_weights(spec: &DistributionSpec) -> [f64; NUM_BINS] {
    let mut weights = [0.0f64; NUM_BINS];

    match *spec {
        DistributionSpec::Uniform => {}
        DistributionSpec::Normal { mean, stddev } => {
            let log_norm = (stddev * (2.0 * PI).sqrt()).ln();
            for (i, w) in weights.iter_mut().enumerate() {
                let z = ((i as u32 + MIN_OUTCOME) as f64 - mean) / stddev;
                *w = -0.5 * z * z - log_norm;
            }
            // z * z overflowed in every bin: the truncated density has
            // collapsed onto the outcome nearest the mean
            if weights.iter().all(|w| !w.is_finite()) {
                weights = [f64::NEG_INFINITY; NUM_BINS];
                weights[nearest_outcome(mean) as usize - MIN_OUTCOME as usize] = 0.0;
            }
        }
        DistributionSpec::Binomial { n, p } => {
            let n_f = n as f64;
            let mut log_coeff = 0.0f64;
            for (i, w) in weights.iter_mut().enumerate() {
                let k = (i as u32 + MIN_OUTCOME) as u64;
                if k > n {
                    *w = f64::NEG_INFINITY;
                    continue;
                }
                let k_f = k as f64;
                log_coeff += (n_f - k_f + 1.0).ln() - k_f.ln();
                *w = log_coeff + xlny(k_f, p) + xlny(n_f - k_f, 1.0 - p);
            }
        }
        DistributionSpec::Poisson { lambda } => {
            let log_lambda = lambda.ln();
            let mut log_factorial = 0.0f64;
            for (i, w) in weights.iter_mut().enumerate() {
                let k_f = (i as u32 + MIN_OUTCOME) as f64;
                log_factorial += k_f.ln();
                *w = k_f * log_lambda - lambda - log_factorial;
            }
        }
    }

    weights
}

/// Probability of each outcome bin, renormalized over the 100-bin support
///
/// Fails with [`SimError::NumericallyUndefined`] when no bin carries any mass
/// (for example a binomial with `p = 0`, whose only outcome 0 lies outside the
/// support).
pub fn bin_probabilities(spec: &DistributionSpec) -> Result<[f64; NUM_BINS], SimError> {
    let mut weights = log_weights(spec);

    let max = weights.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return Err(SimError::NumericallyUndefined(format!(
            "{} has no probability mass on outcomes 1..=100",
            spec
        )));
    }

    for w in weights.iter_mut() {
        *w = (*w - max).exp();
    }
    let total: f64 = weights.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return Err(SimError::NumericallyUndefined(format!(
            "{} probabilities do not normalize",
            spec
        )));
    }
    for w in weights.iter_mut() {
        *w /= total;
    }

    Ok(weights)
}

/// Expected count in each bin after `count` samples
pub fn expected_frequencies(spec: &DistributionSpec, count: u64) -> Result<ExpectedFrequencies, SimError> {
    let count_f = count as f64;

    if let DistributionSpec::Uniform = spec {
        return Ok(ExpectedFrequencies::from_values(vec![count_f / NUM_BINS as f64; NUM_BINS]));
    }

    let probabilities = bin_probabilities(spec)?;
    Ok(ExpectedFrequencies::from_values(
        probabilities.iter().map(|p| p * count_f).collect(),
    ))
}

/// Pearson's chi-squared statistic
///
/// Sums `(observed - expected)^2 / expected` over bins whose expectation is at
/// least [`MIN_EXPECTED_FREQUENCY`]. A non-finite sum is reported as
/// [`FitStatistic::NotAvailable`].
pub fn chi_squared(observed: &[u64], expected: &[f64]) -> FitStatistic {
    debug_assert_eq!(observed.len(), expected.len());

    let statistic: f64 = observed
        .iter()
        .zip(expected)
        // NaN expectations are kept so they surface as NotAvailable
        .filter(|(_, &e)| !(e < MIN_EXPECTED_FREQUENCY))
        .map(|(&o, &e)| {
            let diff = o as f64 - e;
            diff * diff / e
        })
        .sum();

    if statistic.is_finite() {
        FitStatistic::Value(statistic)
    } else {
        FitStatistic::NotAvailable
    }
}

/// Chi-squared of a histogram against the distribution it was sampled from
pub fn goodness_of_fit(spec: &DistributionSpec, histogram: &Histogram) -> FitStatistic {
    let count = histogram.total();
    if count == 0 {
        return FitStatistic::NoData;
    }

    match expected_frequencies(spec, count) {
        Ok(expected) => chi_squared(histogram.counts(), expected.as_slice()),
        Err(e) => {
            log::debug!("goodness of fit unavailable: {}", e);
            FitStatistic::NotAvailable
        }
    }
}
