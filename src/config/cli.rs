//! CLI argument parsing using clap

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Distribution family selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistributionKind {
    /// Every outcome 1-100 equally likely
    Uniform,
    /// Rounded normal variate
    Normal,
    /// Successes in n Bernoulli trials
    Binomial,
    /// Poisson counts
    Poisson,
}

/// SamplePulse - live sampling simulator with running statistics
#[derive(Parser, Debug)]
#[command(name = "samplepulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file (CLI flags take precedence)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    // === Run Options ===
    /// Number of samples to draw
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub samples: Option<i64>,

    /// Milliseconds between samples (0 = as fast as possible)
    #[arg(short = 'i', long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// RNG seed for reproducible runs
    #[arg(long, env = "SAMPLEPULSE_SEED")]
    pub seed: Option<u64>,

    /// Cancel the run after a wall-clock duration (e.g., 500ms, 10s, 2m)
    #[arg(long)]
    pub stop_after: Option<String>,

    /// Change the interval part-way through the run: AFTER:MS (e.g., 2s:0)
    #[arg(long, value_name = "AFTER:MS")]
    pub interval_after: Option<String>,

    /// Driver frame period in milliseconds
    #[arg(long)]
    pub frame_ms: Option<u64>,

    // === Distribution Options ===
    /// Distribution to sample from
    #[arg(short = 'd', long, value_enum)]
    pub distribution: Option<DistributionKind>,

    /// Normal mean
    #[arg(long, allow_negative_numbers = true)]
    pub mean: Option<f64>,

    /// Normal standard deviation
    #[arg(long)]
    pub stddev: Option<f64>,

    /// Binomial number of trials
    #[arg(long)]
    pub trials: Option<u64>,

    /// Binomial success probability (0-1)
    #[arg(long)]
    pub probability: Option<f64>,

    /// Poisson rate
    #[arg(long)]
    pub lambda: Option<f64>,

    // === Display Options ===
    /// Max samples generated per frame when paced
    #[arg(long)]
    pub per_tick_cap: Option<u64>,

    /// Target number of points in the mean trend
    #[arg(long)]
    pub max_plot_points: Option<usize>,

    /// Trend length above which it is downsampled
    #[arg(long)]
    pub downsample_threshold: Option<usize>,

    /// Live progress interval (e.g., 250ms, 1s)
    #[arg(long)]
    pub live_interval: Option<String>,

    /// Disable live progress
    #[arg(long)]
    pub no_live: bool,

    /// Do not print the histogram
    #[arg(long)]
    pub no_histogram: bool,

    /// Do not print the running-mean trend
    #[arg(long)]
    pub no_trend: bool,

    // === Output Options ===
    /// Write a JSON report to this path
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// Write live progress rows to this CSV path
    #[arg(long, value_name = "FILE")]
    pub csv_output: Option<PathBuf>,

    /// Write observed and expected counts per outcome to this CSV path
    #[arg(long, value_name = "FILE")]
    pub histogram_csv: Option<PathBuf>,

    // === Misc ===
    /// Validate and print the configuration without running
    #[arg(long)]
    pub dry_run: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Reject flag combinations that can never be valid
    ///
    /// Parameter ranges are checked later on the merged configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(kind) = self.distribution {
            if let Some(flag) = self.stray_param_flag(kind) {
                anyhow::bail!("--{} does not apply to the {:?} distribution", flag, kind);
            }
        }

        if self.dry_run && self.print_config {
            anyhow::bail!("--dry-run and --print-config are mutually exclusive");
        }

        Ok(())
    }

    /// First distribution parameter flag that `kind` does not take
    pub(crate) fn stray_param_flag(&self, kind: DistributionKind) -> Option<&'static str> {
        let params: [(&'static str, bool); 5] = [
            ("mean", self.mean.is_some()),
            ("stddev", self.stddev.is_some()),
            ("trials", self.trials.is_some()),
            ("probability", self.probability.is_some()),
            ("lambda", self.lambda.is_some()),
        ];
        let accepted: &[&str] = match kind {
            DistributionKind::Uniform => &[],
            DistributionKind::Normal => &["mean", "stddev"],
            DistributionKind::Binomial => &["trials", "probability"],
            DistributionKind::Poisson => &["lambda"],
        };
        params
            .iter()
            .find(|(name, given)| *given && !accepted.contains(name))
            .map(|(name, _)| *name)
    }
}
