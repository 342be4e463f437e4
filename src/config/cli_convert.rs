//! CLI to Config conversion utilities

use crate::config::cli::{Cli, DistributionKind};
use crate::config::IntervalChange;
use crate::distribution::DistributionSpec;
use anyhow::{Context, Result};

/// Default normal parameters when none are given
pub const DEFAULT_NORMAL_MEAN: f64 = 50.0;
pub const DEFAULT_NORMAL_STDDEV: f64 = 15.0;

/// Default binomial parameters when none are given
pub const DEFAULT_BINOMIAL_N: u64 = 100;
pub const DEFAULT_BINOMIAL_P: f64 = 0.5;

/// Default Poisson rate when none is given
pub const DEFAULT_POISSON_LAMBDA: f64 = 10.0;

/// Parse a duration string (e.g., "250ms", "10s", "2m") to milliseconds
///
/// A bare number is taken as milliseconds.
pub fn parse_duration_ms(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("ms") {
        (s.trim_end_matches("ms"), 1u64)
    } else if s.ends_with("sec") || s.ends_with('s') {
        (s.trim_end_matches("sec").trim_end_matches('s'), 1000)
    } else if s.ends_with("min") || s.ends_with('m') {
        (s.trim_end_matches("min").trim_end_matches('m'), 60_000)
    } else if s.ends_with('h') {
        (s.trim_end_matches('h'), 3_600_000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid duration format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Duration out of range: {}", s))
}

/// Parse an interval change of the form `AFTER:MS` (e.g., "2s:0", "500ms:20")
///
/// `AFTER` accepts any [`parse_duration_ms`] format; `MS` is the new interval
/// in milliseconds and is range-checked later by the validator.
pub fn parse_interval_change(s: &str) -> Result<IntervalChange> {
    let (after, interval) = s
        .split_once(':')
        .with_context(|| format!("Expected AFTER:MS, got: {}", s))?;

    let after_ms = parse_duration_ms(after)?;
    let interval_ms: i64 = interval
        .trim()
        .parse()
        .with_context(|| format!("Invalid interval in {}", s))?;

    Ok(IntervalChange {
        after_ms,
        interval_ms,
    })
}

/// Resolve the distribution selected on the command line
///
/// Parameters not given as flags are taken from `base` when it is the same
/// family, otherwise from the built-in defaults. Without `--distribution`,
/// parameter flags adjust `base` in place.
pub fn convert_distribution(cli: &Cli, base: &DistributionSpec) -> Result<DistributionSpec> {
    let kind = match cli.distribution {
        Some(kind) => kind,
        None => {
            let kind = kind_of(base);
            if let Some(flag) = cli.stray_param_flag(kind) {
                anyhow::bail!(
                    "--{} does not apply to the configured {} distribution; select one with --distribution",
                    flag,
                    base.family()
                );
            }
            kind
        }
    };

    let spec = match kind {
        DistributionKind::Uniform => DistributionSpec::Uniform,
        DistributionKind::Normal => {
            let (mean, stddev) = match *base {
                DistributionSpec::Normal { mean, stddev } => (mean, stddev),
                _ => (DEFAULT_NORMAL_MEAN, DEFAULT_NORMAL_STDDEV),
            };
            DistributionSpec::Normal {
                mean: cli.mean.unwrap_or(mean),
                stddev: cli.stddev.unwrap_or(stddev),
            }
        }
        DistributionKind::Binomial => {
            let (n, p) = match *base {
                DistributionSpec::Binomial { n, p } => (n, p),
                _ => (DEFAULT_BINOMIAL_N, DEFAULT_BINOMIAL_P),
            };
            DistributionSpec::Binomial {
                n: cli.trials.unwrap_or(n),
                p: cli.probability.unwrap_or(p),
            }
        }
        DistributionKind::Poisson => {
            let lambda = match *base {
                DistributionSpec::Poisson { lambda } => lambda,
                _ => DEFAULT_POISSON_LAMBDA,
            };
            DistributionSpec::Poisson {
                lambda: cli.lambda.unwrap_or(lambda),
            }
        }
    };

    Ok(spec)
}

fn kind_of(spec: &DistributionSpec) -> DistributionKind {
    match spec {
        DistributionSpec::Uniform => DistributionKind::Uniform,
        DistributionSpec::Normal { .. } => DistributionKind::Normal,
        DistributionSpec::Binomial { .. } => DistributionKind::Binomial,
        DistributionSpec::Poisson { .. } => DistributionKind::Poisson,
    }
}
