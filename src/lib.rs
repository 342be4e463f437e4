//! SamplePulse - live sampling simulator with running statistics
//!
//! SamplePulse draws integer outcomes in 1..=100 from a chosen distribution at
//! a controlled pace and keeps statistics current while the run progresses.
//!
//! # Architecture
//!
//! - **Distributions**: Uniform, Normal, Binomial and Poisson, clamped to 1..=100
//! - **Online statistics**: Running sums, histogram, mean trend, 95% CI
//! - **Goodness of fit**: Chi-squared against the sampled distribution
//! - **Scheduler**: Time-paced generation driven by an external clock
//! - **Output**: Terminal charts, live progress, JSON and CSV exports

pub mod config;
pub mod distribution;
pub mod error;
pub mod output;
pub mod runner;
pub mod scheduler;
pub mod stats;
pub mod util;

// Re-export commonly used types
pub use config::SimConfig;
pub use distribution::{DistributionSampler, DistributionSpec};
pub use error::SimError;
pub use scheduler::{snapshot::Snapshot, RunRequest, RunStatus, SampleScheduler};

/// Result type used throughout SamplePulse
pub type Result<T> = anyhow::Result<T>;
