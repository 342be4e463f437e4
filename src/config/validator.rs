//! Configuration validation

use super::*;
use anyhow::{Context, Result};

/// Validate complete configuration
pub fn validate_config(config: &SimConfig) -> Result<()> {
    validate_run(&config.run)?;
    validate_distribution(&config.distribution)?;
    validate_display(&config.display)?;
    validate_output(&config.output)?;

    Ok(())
}

/// Validate run configuration
pub fn validate_run(run: &RunConfig) -> Result<()> {
    if run.samples <= 0 {
        anyhow::bail!("samples must be positive, got {}", run.samples);
    }

    if run.interval_ms < 0 {
        anyhow::bail!("interval_ms must be non-negative, got {}", run.interval_ms);
    }

    if run.frame_ms == 0 || run.frame_ms > 1000 {
        anyhow::bail!("frame_ms must be between 1 and 1000, got {}", run.frame_ms);
    }

    if run.stop_after_ms == Some(0) {
        anyhow::bail!("stop_after_ms must be positive when set");
    }

    if let Some(change) = run.interval_change {
        if change.interval_ms < 0 {
            anyhow::bail!(
                "interval_change.interval_ms must be non-negative, got {}",
                change.interval_ms
            );
        }
    }

    Ok(())
}

/// Validate distribution parameters
pub fn validate_distribution(dist: &DistributionSpec) -> Result<()> {
    dist.validate()
        .with_context(|| format!("Invalid {} distribution", dist.family()))
}

/// Validate display configuration
pub fn validate_display(display: &DisplayConfig) -> Result<()> {
    if display.max_plot_points == 0 {
        anyhow::bail!("max_plot_points must be at least 1");
    }

    if display.per_tick_cap == 0 {
        anyhow::bail!("per_tick_cap must be at least 1");
    }

    if display.histogram_rows == 0 || display.histogram_rows > crate::distribution::NUM_BINS {
        anyhow::bail!(
            "histogram_rows must be between 1 and {}, got {}",
            crate::distribution::NUM_BINS,
            display.histogram_rows
        );
    }

    if display.chart_width < 10 {
        anyhow::bail!("chart_width must be at least 10, got {}", display.chart_width);
    }

    if display.downsample_threshold < display.max_plot_points {
        log::warn!(
            "downsample_threshold ({}) is below max_plot_points ({}); trends will be downsampled early",
            display.downsample_threshold,
            display.max_plot_points
        );
    }

    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    let paths: Vec<&PathBuf> = [&output.json_output, &output.csv_output, &output.histogram_csv]
        .into_iter()
        .flatten()
        .collect();

    for (i, path) in paths.iter().enumerate() {
        if paths[i + 1..].contains(path) {
            anyhow::bail!("output path {} is used for more than one output", path.display());
        }
    }

    Ok(())
}
