//! JSON output formatting
//!
//! A single report document per run with:
//! - Run configuration (distribution, target, pacing, seed)
//! - Final status and sample counts
//! - Moments, chi-squared, histogram counts and expected frequencies
//! - Downsampled running-mean trend

use crate::config::{IntervalChange, SimConfig};
use crate::distribution::DistributionSpec;
use crate::scheduler::snapshot::Snapshot;
use crate::scheduler::RunStatus;
use crate::stats::fit::{expected_frequencies, FitStatistic};
use crate::stats::Moments;
use crate::util::time::calculate_rate;
use crate::Result;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    /// RFC 3339 timestamp of report creation
    pub timestamp: String,
    pub tool_version: String,
    pub config: JsonRunConfig,
    pub result: JsonRunResult,
}

/// Parameters the run was started with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunConfig {
    pub distribution: DistributionSpec,
    pub samples_target: i64,
    pub interval_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_after_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_change: Option<IntervalChange>,
}

/// Final state of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRunResult {
    pub status: RunStatus,
    pub samples_generated: u64,
    pub elapsed_sec: f64,
    pub samples_per_sec: f64,
    /// Absent when no sample was drawn
    pub moments: Option<Moments>,
    pub chi_squared: FitStatistic,
    /// Counts for outcomes 1..=100
    pub histogram: Vec<u64>,
    /// Expected counts under the run's distribution, absent when undefined
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Vec<f64>>,
    pub mean_trend: Vec<f64>,
}

impl JsonReport {
    /// Build a report from the final snapshot
    pub fn build(snapshot: &Snapshot, elapsed: Duration, config: &SimConfig) -> Self {
        let expected = snapshot.distribution.as_ref().and_then(|spec| {
            expected_frequencies(spec, snapshot.histogram.total())
                .ok()
                .map(|e| e.as_slice().to_vec())
        });

        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            config: JsonRunConfig {
                distribution: config.distribution,
                samples_target: config.run.samples,
                interval_ms: config.run.interval_ms,
                seed: config.run.seed,
                stop_after_ms: config.run.stop_after_ms,
                interval_change: config.run.interval_change,
            },
            result: JsonRunResult {
                status: snapshot.status,
                samples_generated: snapshot.samples_generated,
                elapsed_sec: elapsed.as_secs_f64(),
                samples_per_sec: calculate_rate(snapshot.samples_generated, elapsed),
                moments: snapshot.moments,
                chi_squared: snapshot.chi_squared,
                histogram: snapshot.histogram.counts().to_vec(),
                expected,
                mean_trend: snapshot.mean_trend.clone(),
            },
        }
    }
}

/// Write JSON report to file
pub fn write_json_output(output_path: &Path, report: &JsonReport, pretty: bool) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, report)?;
    } else {
        serde_json::to_writer(&mut writer, report)?;
    }
    writer.flush()?;
    log::info!("Wrote JSON report to {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{RunRequest, SampleScheduler, SchedulerSettings};

    fn finished(config: &SimConfig) -> Snapshot {
        let mut scheduler = SampleScheduler::new(config.scheduler_settings());
        scheduler.start_run(config.run_request().unwrap(), 0.0).unwrap();
        scheduler.tick(0.0);
        scheduler.current_snapshot()
    }

    #[test]
    fn test_build_report() {
        let mut config = SimConfig::default();
        config.run.samples = 400;
        config.run.seed = Some(8);
        config.distribution = DistributionSpec::Binomial { n: 50, p: 0.4 };

        let report = JsonReport::build(&finished(&config), Duration::from_millis(200), &config);
        assert_eq!(report.result.status, RunStatus::Completed);
        assert_eq!(report.result.samples_generated, 400);
        assert_eq!(report.result.histogram.len(), 100);
        assert_eq!(report.result.histogram.iter().sum::<u64>(), 400);
        let expected = report.result.expected.as_ref().unwrap();
        assert!((expected.iter().sum::<f64>() - 400.0).abs() < 1e-6);
        assert!((report.result.samples_per_sec - 2000.0).abs() < 1e-9);
        assert!(report.result.moments.is_some());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.timestamp).is_ok());
    }

    #[test]
    fn test_report_without_run() {
        let report = JsonReport::build(&Snapshot::empty(), Duration::ZERO, &SimConfig::default());
        assert_eq!(report.result.status, RunStatus::Idle);
        assert!(report.result.expected.is_none());

        let value = serde_json::to_value(&report).unwrap();
        assert!(value["result"]["moments"].is_null());
        assert_eq!(value["result"]["chi_squared"], "no_data");
        assert!(value["result"].get("expected").is_none());
        assert!(value["config"].get("seed").is_none());
    }

    #[test]
    fn test_write_json_output() {
        let mut config = SimConfig::default();
        config.run.samples = 50;
        config.run.seed = Some(1);
        let report = JsonReport::build(&finished(&config), Duration::from_millis(10), &config);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        write_json_output(&path, &report, true).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: JsonReport = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.result.samples_generated, 50);
        assert_eq!(parsed.config.distribution, DistributionSpec::Uniform);
        assert_eq!(parsed.config.seed, Some(1));
    }

    #[test]
    fn test_write_json_output_bad_path() {
        let report = JsonReport::build(&Snapshot::empty(), Duration::ZERO, &SimConfig::default());
        let result = write_json_output(Path::new("/nonexistent/dir/report.json"), &report, false);
        assert!(result.is_err());
    }

    #[test]
    fn test_report_before_first_tick() {
        let request = RunRequest::new(10, 0, DistributionSpec::Uniform).unwrap();
        let mut scheduler = SampleScheduler::new(SchedulerSettings::default());
        scheduler.start_run(request, 0.0).unwrap();
        let report = JsonReport::build(&scheduler.current_snapshot(), Duration::ZERO, &SimConfig::default());
        assert_eq!(report.result.status, RunStatus::Running);
        assert_eq!(report.result.samples_generated, 0);
        assert_eq!(report.result.expected.as_ref().map(|e| e.iter().sum::<f64>()), Some(0.0));
    }
}
