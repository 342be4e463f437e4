//! Poisson outcome distribution
//!
//! Uses Knuth's multiplicative algorithm: multiply uniform draws until the
//! product falls below `exp(-lambda)`. The number of draws minus one is the
//! variate. Counts above [`MAX_OUTCOME`] fold into the top bin, so drawing
//! stops there; the cost of one outcome is at most 101 uniform draws.

use super::{clamp_outcome, Distribution, MAX_OUTCOME, MAX_POISSON_LAMBDA};
use rand::Rng;

/// Poisson distribution with precomputed acceptance threshold
#[derive(Debug, Clone, Copy)]
pub struct PoissonDistribution {
    /// exp(-lambda)
    limit: f64,
}

impl PoissonDistribution {
    pub(crate) fn new(lambda: f64) -> Self {
        debug_assert!(lambda > 0.0 && lambda <= MAX_POISSON_LAMBDA, "lambda {}", lambda);
        Self {
            limit: (-lambda).exp(),
        }
    }
}

impl Distribution for PoissonDistribution {
    fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let mut draws: i64 = 0;
        let mut product = 1.0f64;
        loop {
            draws += 1;
            product *= rng.gen::<f64>();
            if product < self.limit || draws > MAX_OUTCOME as i64 {
                break;
            }
        }
        clamp_outcome(draws - 1)
    }
}
