//! Outcome histogram
//!
//! A fixed 100-bin counter array, one bin per outcome. Bin `i` counts outcome
//! `i + 1`. Recording is a single array increment with no allocation.

use crate::distribution::{MAX_OUTCOME, MIN_OUTCOME, NUM_BINS};
use serde::{Deserialize, Serialize};

/// Per-outcome sample counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    #[serde(with = "serde_arrays")]
    bins: [u64; NUM_BINS],
}

// Helper module for serializing the fixed-size bin array
mod serde_arrays {
    use super::NUM_BINS;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(arr: &[u64; NUM_BINS], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        arr.as_slice().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<[u64; NUM_BINS], D::Error>
    where
        D: Deserializer<'de>,
    {
        let vec: Vec<u64> = Vec::deserialize(deserializer)?;
        if vec.len() != NUM_BINS {
            return Err(serde::de::Error::custom(format!(
                "Expected {} elements, got {}",
                NUM_BINS,
                vec.len()
            )));
        }
        let mut arr = [0u64; NUM_BINS];
        arr.copy_from_slice(&vec);
        Ok(arr)
    }
}

impl Histogram {
    /// Create an empty histogram
    pub fn new() -> Self {
        Self { bins: [0; NUM_BINS] }
    }

    /// Build a histogram from explicit bin counts
    pub fn from_counts(bins: [u64; NUM_BINS]) -> Self {
        Self { bins }
    }

    /// Count one occurrence of `value`
    ///
    /// Values outside `[1, 100]` are folded into the boundary bins.
    #[inline]
    pub fn record(&mut self, value: u32) {
        let value = value.clamp(MIN_OUTCOME, MAX_OUTCOME);
        self.bins[(value - MIN_OUTCOME) as usize] += 1;
    }

    /// Count for a given outcome value
    pub fn count_of(&self, value: u32) -> u64 {
        if !(MIN_OUTCOME..=MAX_OUTCOME).contains(&value) {
            return 0;
        }
        self.bins[(value - MIN_OUTCOME) as usize]
    }

    /// All bin counts, indexed by `value - 1`
    pub fn counts(&self) -> &[u64; NUM_BINS] {
        &self.bins
    }

    /// Total number of recorded samples
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Largest bin count (0 when empty)
    pub fn max_count(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// Outcome with the largest count, lowest value on ties
    pub fn mode(&self) -> Option<u32> {
        let max = self.max_count();
        if max == 0 {
            return None;
        }
        self.bins
            .iter()
            .position(|&c| c == max)
            .map(|i| i as u32 + MIN_OUTCOME)
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_new_is_empty() {
        let hist = Histogram::new();
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.max_count(), 0);
        assert_eq!(hist.mode(), None);
    }

    #[test]
    fn test_histogram_record() {
        let mut hist = Histogram::new();
        hist.record(1);
        hist.record(100);
        hist.record(42);
        hist.record(42);

        assert_eq!(hist.counts()[0], 1);
        assert_eq!(hist.counts()[99], 1);
        assert_eq!(hist.count_of(42), 2);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.max_count(), 2);
        assert_eq!(hist.mode(), Some(42));
    }

    #[test]
    fn test_histogram_folds_out_of_range() {
        let mut hist = Histogram::new();
        hist.record(0);
        hist.record(250);
        assert_eq!(hist.count_of(1), 1);
        assert_eq!(hist.count_of(100), 1);
        assert_eq!(hist.count_of(0), 0);
        assert_eq!(hist.count_of(101), 0);
    }

    #[test]
    fn test_histogram_serde() {
        let mut hist = Histogram::new();
        hist.record(7);
        let json = serde_json::to_string(&hist).unwrap();
        let back: Histogram = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hist);

        let short = r#"{"bins":[1,2,3]}"#;
        assert!(serde_json::from_str::<Histogram>(short).is_err());
    }
}
