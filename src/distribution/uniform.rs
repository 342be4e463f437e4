//! Uniform outcome distribution
//!
//! Every outcome in `[1, 100]` has equal probability. This is the default
//! family and the one the chi-squared statistic is most often read against.

use super::{Distribution, MAX_OUTCOME, MIN_OUTCOME};
use rand::Rng;

/// Uniform distribution over the full outcome support
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDistribution;

impl Distribution for UniformDistribution {
    #[inline(always)]
    fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(MIN_OUTCOME..=MAX_OUTCOME)
    }
}
