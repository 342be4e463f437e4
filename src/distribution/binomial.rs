//! Binomial outcome distribution
//!
//! Counts successes in `n` independent Bernoulli(`p`) trials. A count of 0 or
//! anything above 100 is folded into the boundary bins; this is a display
//! simplification rather than an exact mapping of the binomial onto `[1, 100]`.

use super::{clamp_outcome, Distribution};
use rand::Rng;

/// Binomial distribution parameters
#[derive(Debug, Clone, Copy)]
pub struct BinomialDistribution {
    /// Number of trials (>= 1)
    n: u64,

    /// Success probability per trial, in [0, 1]
    p: f64,
}

impl BinomialDistribution {
    pub(crate) fn new(n: u64, p: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p), "p {}", p);
        Self { n, p }
    }
}

impl Distribution for BinomialDistribution {
    fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let mut successes: u64 = 0;
        for _ in 0..self.n {
            if rng.gen_bool(self.p) {
                successes += 1;
            }
        }
        clamp_outcome(successes.min(i64::MAX as u64) as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_single_certain_trial_is_one() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let dist = BinomialDistribution::new(1, 1.0);
        for _ in 0..1000 {
            assert_eq!(dist.sample_outcome(&mut rng), 1);
        }
    }

    #[test]
    fn test_zero_probability_folds_to_one() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let dist = BinomialDistribution::new(50, 0.0);
        for _ in 0..100 {
            assert_eq!(dist.sample_outcome(&mut rng), 1);
        }
    }

    #[test]
    fn test_large_n_folds_to_hundred() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
        let dist = BinomialDistribution::new(1000, 1.0);
        for _ in 0..20 {
            assert_eq!(dist.sample_outcome(&mut rng), 100);
        }
    }

    #[test]
    fn test_binomial_mean() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
        let dist = BinomialDistribution::new(80, 0.5);
        let n = 5_000;
        let total: u64 = (0..n).map(|_| dist.sample_outcome(&mut rng) as u64).sum();
        let mean = total as f64 / n as f64;

        // E[X] = n * p = 40, sd of the sample mean ~ 0.063
        assert!((mean - 40.0).abs() < 0.5, "mean = {}", mean);
    }
}
