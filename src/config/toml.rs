//! TOML configuration file parsing

use super::cli::Cli;
use super::cli_convert::{convert_distribution, parse_duration_ms, parse_interval_change};
use super::SimConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());

    Ok(config)
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<SimConfig> {
    let config: SimConfig = ::toml::from_str(contents)
        .context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Render a configuration as TOML
pub fn to_toml_string(config: &SimConfig) -> Result<String> {
    ::toml::to_string_pretty(config).context("Failed to serialize configuration")
}

/// Build the effective configuration: file (if any), then CLI overrides
pub fn load_config(cli: &Cli) -> Result<SimConfig> {
    let base = match cli.config {
        Some(ref path) => parse_toml_file(path)?,
        None => SimConfig::default(),
    };
    merge_cli_with_config(cli, base)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: SimConfig) -> Result<SimConfig> {
    // Override run settings
    if let Some(samples) = cli.samples {
        config.run.samples = samples;
    }
    if let Some(interval) = cli.interval {
        config.run.interval_ms = interval;
    }
    if let Some(seed) = cli.seed {
        config.run.seed = Some(seed);
    }
    if let Some(frame_ms) = cli.frame_ms {
        config.run.frame_ms = frame_ms;
    }
    if let Some(ref stop) = cli.stop_after {
        config.run.stop_after_ms = Some(parse_duration_ms(stop).context("Invalid --stop-after")?);
    }
    if let Some(ref change) = cli.interval_after {
        config.run.interval_change = Some(parse_interval_change(change).context("Invalid --interval-after")?);
    }

    // Override distribution
    config.distribution = convert_distribution(cli, &config.distribution)?;

    // Override display settings
    if let Some(cap) = cli.per_tick_cap {
        config.display.per_tick_cap = cap;
    }
    if let Some(points) = cli.max_plot_points {
        config.display.max_plot_points = points;
    }
    if let Some(threshold) = cli.downsample_threshold {
        config.display.downsample_threshold = threshold;
    }
    if let Some(ref live) = cli.live_interval {
        config.display.live_interval_ms = parse_duration_ms(live).context("Invalid --live-interval")?;
    }

    // Override output settings
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if let Some(ref path) = cli.csv_output {
        config.output.csv_output = Some(path.clone());
    }
    if let Some(ref path) = cli.histogram_csv {
        config.output.histogram_csv = Some(path.clone());
    }
    if cli.no_live {
        config.output.no_live = true;
    }
    if cli.no_histogram {
        config.output.show_histogram = false;
    }
    if cli.no_trend {
        config.output.show_trend = false;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::DistributionSpec;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("samplepulse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config = parse_toml_string("").unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [run]
            samples = 2000
            interval_ms = 5
            seed = 7
            stop_after_ms = 30000

            [distribution]
            type = "normal"
            mean = 40.0
            stddev = 12.5

            [display]
            per_tick_cap = 50
            max_plot_points = 500

            [output]
            json_output = "report.json"
            show_trend = false
        "#;

        let config = parse_toml_string(toml_str).unwrap();
        assert_eq!(config.run.samples, 2000);
        assert_eq!(config.run.interval_ms, 5);
        assert_eq!(config.run.seed, Some(7));
        assert_eq!(config.run.stop_after_ms, Some(30_000));
        assert_eq!(config.run.frame_ms, 16);
        assert_eq!(config.distribution, DistributionSpec::Normal { mean: 40.0, stddev: 12.5 });
        assert_eq!(config.display.per_tick_cap, 50);
        assert_eq!(config.display.max_plot_points, 500);
        assert_eq!(config.display.downsample_threshold, 10_000);
        assert_eq!(config.output.json_output.as_deref(), Some(Path::new("report.json")));
        assert!(config.output.show_histogram);
        assert!(!config.output.show_trend);
    }

    #[test]
    fn test_parse_negative_values_survive_for_validation() {
        let config = parse_toml_string("[run]\nsamples = -10\ninterval_ms = -1\n").unwrap();
        assert_eq!(config.run.samples, -10);
        assert_eq!(config.run.interval_ms, -1);
    }

    #[test]
    fn test_parse_unknown_distribution_fails() {
        let result = parse_toml_string("[distribution]\ntype = \"cauchy\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = SimConfig::default();
        config.distribution = DistributionSpec::Binomial { n: 30, p: 0.2 };
        config.run.seed = Some(11);
        let text = to_toml_string(&config).unwrap();
        assert_eq!(parse_toml_string(&text).unwrap(), config);
    }

    #[test]
    fn test_cli_overrides_file() {
        let base = parse_toml_string(
            "[run]\nsamples = 100\ninterval_ms = 20\n[distribution]\ntype = \"poisson\"\nlambda = 4.0\n",
        )
        .unwrap();
        let cli = parse(&[
            "-n", "900", "--lambda", "9", "--no-trend", "--stop-after", "2s", "--interval-after", "1s:0",
        ]);

        let config = merge_cli_with_config(&cli, base).unwrap();
        assert_eq!(config.run.samples, 900);
        assert_eq!(config.run.interval_ms, 20);
        assert_eq!(config.run.stop_after_ms, Some(2_000));
        assert_eq!(config.run.interval_change.map(|c| (c.after_ms, c.interval_ms)), Some((1_000, 0)));
        assert_eq!(config.distribution, DistributionSpec::Poisson { lambda: 9.0 });
        assert!(!config.output.show_trend);
    }

    #[test]
    fn test_invalid_duration_flag() {
        let cli = parse(&["--live-interval", "soon"]);
        assert!(merge_cli_with_config(&cli, SimConfig::default()).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[run]\nsamples = 321\n[distribution]\ntype = \"uniform\"").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let cli = parse(&["--config", &path]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.run.samples, 321);
    }

    #[test]
    fn test_load_config_missing_file() {
        let cli = parse(&["--config", "/nonexistent/samplepulse.toml"]);
        let err = load_config(&cli).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
