//! Normal (Gaussian) outcome distribution
//!
//! Outcomes cluster around `mean` with spread `stddev`, rounded to the
//! nearest integer and folded into `[1, 100]`.
//!
//! # Performance
//!
//! Uses the Box-Muller transform: two uniform draws give one standard normal
//! variate in O(1). The second variate of the pair is discarded so every call
//! is independent of the previous one.

use super::{clamp_outcome, Distribution};
use rand::Rng;
use std::f64::consts::PI;

/// Normal distribution parameters
#[derive(Debug, Clone, Copy)]
pub struct NormalDistribution {
    mean: f64,
    stddev: f64,
}

impl NormalDistribution {
    pub fn new(mean: f64, stddev: f64) -> Self {
        Self { mean, stddev }
    }
}

/// Uniform draw in (0, 1); zero is rejected so `ln` stays finite
#[inline]
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    loop {
        let u: f64 = rng.gen();
        if u != 0.0 {
            return u;
        }
    }
}

/// Standard normal variate via Box-Muller
#[inline]
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1 = open_unit(rng);
    let u2 = open_unit(rng);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl Distribution for NormalDistribution {
    #[inline]
    fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let z = standard_normal(rng);
        let value = (self.mean + z * self.stddev).round();

        // Saturating float-to-int cast keeps far tails at the boundaries
        clamp_outcome(value as i64)
    }
}
