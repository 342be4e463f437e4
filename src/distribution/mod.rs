//! Outcome distributions
//!
//! This module provides the distribution families a simulation run can draw
//! from. Every family produces integer outcomes on the fixed display support
//! `[1, 100]`; raw variates outside that range are folded into the nearest
//! boundary bin.
//!
//! # Distributions
//!
//! - **Uniform**: Equal probability for every outcome
//! - **Normal**: Box-Muller variate, rounded to the nearest integer
//! - **Binomial**: Sum of `n` Bernoulli(`p`) trials
//! - **Poisson**: Knuth's multiplicative algorithm
//!
//! # Clamping
//!
//! Folding out-of-range values into bins 1 and 100 keeps every outcome
//! displayable. It distorts the tails relative to the true distribution; the
//! goodness-of-fit engine does not model the folded mass.
//!
//! # Example
//!
//! ```
//! use samplepulse::distribution::{DistributionSampler, DistributionSpec};
//!
//! let mut sampler = DistributionSampler::with_seed(7);
//! let spec = DistributionSpec::Normal { mean: 50.0, stddev: 10.0 };
//! let value = sampler.sample(&spec).unwrap();
//! assert!((1..=100).contains(&value));
//! ```

pub mod binomial;
pub mod normal;
pub mod poisson;
pub mod uniform;

use crate::error::SimError;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest outcome a sampler may return
pub const MIN_OUTCOME: u32 = 1;

/// Largest outcome a sampler may return
pub const MAX_OUTCOME: u32 = 100;

/// Number of histogram bins (one per outcome)
pub const NUM_BINS: usize = (MAX_OUTCOME - MIN_OUTCOME + 1) as usize;

/// Upper bound on binomial trials per draw (each draw costs `n` RNG calls)
pub const MAX_BINOMIAL_TRIALS: u64 = 100_000;

/// Upper bound on the Poisson rate; `exp(-lambda)` must stay a normal float
pub const MAX_POISSON_LAMBDA: f64 = 500.0;

/// Distribution trait for outcome generation
///
/// Implementations draw one outcome in `[MIN_OUTCOME, MAX_OUTCOME]` per call.
/// They hold only parameters; randomness comes from the caller's RNG so a
/// single seeded source drives a whole run.
pub trait Distribution {
    /// Draw the next outcome
    fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32;
}

/// Fold a raw integer variate into the displayable support
#[inline]
pub fn clamp_outcome(raw: i64) -> u32 {
    raw.clamp(MIN_OUTCOME as i64, MAX_OUTCOME as i64) as u32
}

/// Selected distribution family and its parameters
///
/// Immutable for the lifetime of a run. Serialized with an internal `type`
/// tag so TOML configs read naturally:
///
/// ```toml
/// [distribution]
/// type = "binomial"
/// n = 100
/// p = 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DistributionSpec {
    Uniform,
    Normal { mean: f64, stddev: f64 },
    Binomial { n: u64, p: f64 },
    Poisson { lambda: f64 },
}

impl Default for DistributionSpec {
    fn default() -> Self {
        Self::Uniform
    }
}

impl DistributionSpec {
    /// Check the family parameters
    ///
    /// Returns [`SimError::InvalidParameter`] naming the offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            DistributionSpec::Uniform => Ok(()),
            DistributionSpec::Normal { mean, stddev } => {
                if !mean.is_finite() {
                    return Err(SimError::invalid(format!("normal mean must be finite, got {}", mean)));
                }
                if !stddev.is_finite() || stddev <= 0.0 {
                    return Err(SimError::invalid(format!(
                        "normal stddev must be positive and finite, got {}",
                        stddev
                    )));
                }
                Ok(())
            }
            DistributionSpec::Binomial { n, p } => {
                if n == 0 || n > MAX_BINOMIAL_TRIALS {
                    return Err(SimError::invalid(format!(
                        "binomial n must be between 1 and {}, got {}",
                        MAX_BINOMIAL_TRIALS, n
                    )));
                }
                if !(0.0..=1.0).contains(&p) {
                    return Err(SimError::invalid(format!("binomial p must be in [0, 1], got {}", p)));
                }
                Ok(())
            }
            DistributionSpec::Poisson { lambda } => {
                if !lambda.is_finite() || lambda <= 0.0 || lambda > MAX_POISSON_LAMBDA {
                    return Err(SimError::invalid(format!(
                        "poisson lambda must be in (0, {}], got {}",
                        MAX_POISSON_LAMBDA, lambda
                    )));
                }
                Ok(())
            }
        }
    }

    /// Short family name, as used in config files
    pub fn family(&self) -> &'static str {
        match self {
            DistributionSpec::Uniform => "uniform",
            DistributionSpec::Normal { .. } => "normal",
            DistributionSpec::Binomial { .. } => "binomial",
            DistributionSpec::Poisson { .. } => "poisson",
        }
    }
}

impl fmt::Display for DistributionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionSpec::Uniform => write!(f, "uniform"),
            DistributionSpec::Normal { mean, stddev } => {
                write!(f, "normal(mean={}, stddev={})", mean, stddev)
            }
            DistributionSpec::Binomial { n, p } => write!(f, "binomial(n={}, p={})", n, p),
            DistributionSpec::Poisson { lambda } => write!(f, "poisson(lambda={})", lambda),
        }
    }
}

/// Draws outcomes for any [`DistributionSpec`]
///
/// Owns the run's random source. Uses xoshiro256++ which is fast enough to be
/// called tens of thousands of times per frame and is reproducible when
/// seeded.
pub struct DistributionSampler {
    rng: Xoshiro256PlusPlus,
}

impl DistributionSampler {
    /// Create a sampler with a random seed
    pub fn new() -> Self {
        Self {
            rng: Xoshiro256PlusPlus::from_entropy(),
        }
    }

    /// Create a sampler with a specific seed
    ///
    /// Useful for reproducible runs and tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Draw one outcome in `[1, 100]`
    ///
    /// Rejects parameters that fail [`DistributionSpec::validate`] with
    /// [`SimError::InvalidParameter`] instead of drawing from them.
    pub fn sample(&mut self, spec: &DistributionSpec) -> Result<u32, SimError> {
        spec.validate()?;
        Ok(self.draw(spec))
    }

    /// Draw one outcome from a spec that already passed validation
    ///
    /// Hot path for the scheduler, which validates once per run.
    #[inline]
    pub(crate) fn draw(&mut self, spec: &DistributionSpec) -> u32 {
        debug_assert!(spec.validate().is_ok(), "unvalidated spec {}", spec);
        match *spec {
            DistributionSpec::Uniform => uniform::UniformDistribution.sample_outcome(&mut self.rng),
            DistributionSpec::Normal { mean, stddev } => {
                normal::NormalDistribution::new(mean, stddev).sample_outcome(&mut self.rng)
            }
            DistributionSpec::Binomial { n, p } => {
                binomial::BinomialDistribution::new(n, p).sample_outcome(&mut self.rng)
            }
            DistributionSpec::Poisson { lambda } => {
                poisson::PoissonDistribution::new(lambda).sample_outcome(&mut self.rng)
            }
        }
    }
}

impl Default for DistributionSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_families() -> Vec<DistributionSpec> {
        vec![
            DistributionSpec::Uniform,
            DistributionSpec::Normal { mean: 50.0, stddev: 15.0 },
            DistributionSpec::Normal { mean: -20.0, stddev: 40.0 },
            DistributionSpec::Binomial { n: 100, p: 0.5 },
            DistributionSpec::Binomial { n: 500, p: 0.9 },
            DistributionSpec::Poisson { lambda: 4.0 },
            DistributionSpec::Poisson { lambda: 250.0 },
        ]
    }

    #[test]
    fn test_samples_stay_in_range() {
        let mut sampler = DistributionSampler::with_seed(42);
        for spec in all_families() {
            for _ in 0..10_000 {
                let value = sampler.draw(&spec);
                assert!(
                    (MIN_OUTCOME..=MAX_OUTCOME).contains(&value),
                    "{} produced out-of-range value {}",
                    spec,
                    value
                );
            }
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let mut a = DistributionSampler::with_seed(12345);
        let mut b = DistributionSampler::with_seed(12345);
        for spec in all_families() {
            for _ in 0..50 {
                assert_eq!(a.draw(&spec), b.draw(&spec));
            }
        }
    }

    #[test]
    fn test_sample_rejects_invalid_spec() {
        let mut sampler = DistributionSampler::with_seed(3);
        let bad = [
            DistributionSpec::Poisson { lambda: 800.0 },
            DistributionSpec::Binomial { n: 10, p: 1.5 },
            DistributionSpec::Normal { mean: 50.0, stddev: -2.0 },
        ];
        for spec in bad {
            assert!(
                matches!(sampler.sample(&spec), Err(SimError::InvalidParameter(_))),
                "{} should be rejected",
                spec
            );
        }
        let value = sampler.sample(&DistributionSpec::Poisson { lambda: 5.0 }).unwrap();
        assert!((MIN_OUTCOME..=MAX_OUTCOME).contains(&value));
    }

    #[test]
    fn test_clamp_outcome() {
        assert_eq!(clamp_outcome(-5), 1);
        assert_eq!(clamp_outcome(0), 1);
        assert_eq!(clamp_outcome(1), 1);
        assert_eq!(clamp_outcome(57), 57);
        assert_eq!(clamp_outcome(100), 100);
        assert_eq!(clamp_outcome(1_000), 100);
    }

    #[test]
    fn test_validate_accepts_reasonable_parameters() {
        for spec in all_families() {
            assert!(spec.validate().is_ok(), "{} should be valid", spec);
        }
        assert!(DistributionSpec::Binomial { n: 1, p: 0.0 }.validate().is_ok());
        assert!(DistributionSpec::Binomial { n: 1, p: 1.0 }.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_parameters() {
        let bad = [
            DistributionSpec::Normal { mean: 50.0, stddev: 0.0 },
            DistributionSpec::Normal { mean: 50.0, stddev: -1.0 },
            DistributionSpec::Normal { mean: f64::NAN, stddev: 1.0 },
            DistributionSpec::Binomial { n: 0, p: 0.5 },
            DistributionSpec::Binomial { n: MAX_BINOMIAL_TRIALS + 1, p: 0.5 },
            DistributionSpec::Binomial { n: 10, p: -0.1 },
            DistributionSpec::Binomial { n: 10, p: 1.5 },
            DistributionSpec::Binomial { n: 10, p: f64::NAN },
            DistributionSpec::Poisson { lambda: 0.0 },
            DistributionSpec::Poisson { lambda: -3.0 },
            DistributionSpec::Poisson { lambda: MAX_POISSON_LAMBDA * 2.0 },
        ];
        for spec in bad {
            assert!(
                matches!(spec.validate(), Err(SimError::InvalidParameter(_))),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_spec_toml_round_trip_shape() {
        #[derive(Deserialize)]
        struct Wrapper {
            distribution: DistributionSpec,
        }
        let parsed: Wrapper = toml::from_str("[distribution]\ntype = \"poisson\"\nlambda = 3.5\n").unwrap();
        assert_eq!(parsed.distribution, DistributionSpec::Poisson { lambda: 3.5 });

        let parsed: Wrapper = toml::from_str("[distribution]\ntype = \"uniform\"\n").unwrap();
        assert_eq!(parsed.distribution, DistributionSpec::Uniform);
    }

    #[test]
    fn test_display() {
        assert_eq!(DistributionSpec::Uniform.to_string(), "uniform");
        assert_eq!(
            DistributionSpec::Binomial { n: 10, p: 0.25 }.to_string(),
            "binomial(n=10, p=0.25)"
        );
        assert_eq!(DistributionSpec::Poisson { lambda: 2.0 }.family(), "poisson");
    }
}
