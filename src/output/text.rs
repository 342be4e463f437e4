//! Human-readable text output

use crate::config::SimConfig;
use crate::distribution::NUM_BINS;
use crate::scheduler::snapshot::Snapshot;
use crate::stats::histogram::Histogram;
use crate::util::format_number;
use crate::util::time::{calculate_rate, format_duration, format_rate};
use std::time::Duration;

/// Rows of the running-mean trend chart
pub const TREND_HEIGHT: usize = 12;

/// Print run results to console
///
/// Displays:
/// - Run status and sample counts
/// - Mean, standard deviation and 95% confidence interval
/// - Chi-squared goodness of fit
/// - Histogram and running-mean trend (if enabled)
pub fn print_results(snapshot: &Snapshot, elapsed: Duration, config: &SimConfig) {
    println!("═══════════════════════════════════════════════════════════");
    println!("                    RUN RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Elapsed Time: {}", format_duration(elapsed));
    println!("Status:       {}", snapshot.status);
    if let Some(ref dist) = snapshot.distribution {
        println!("Distribution: {}", dist);
    }
    println!();

    println!("Samples:");
    println!(
        "  Generated: {} / {} ({:.1}%)",
        format_number(snapshot.samples_generated),
        format_number(snapshot.samples_target),
        snapshot.progress() * 100.0
    );
    println!(
        "  Rate:      {} samples/s",
        format_rate(calculate_rate(snapshot.samples_generated, elapsed))
    );
    println!();

    print!("{}", format_summary(snapshot));

    if config.output.show_histogram && !snapshot.is_empty() {
        println!();
        print!(
            "{}",
            render_histogram(
                &snapshot.histogram,
                config.display.histogram_rows,
                config.display.chart_width
            )
        );
    }

    if config.output.show_trend && snapshot.mean_trend.len() > 1 {
        println!();
        print!(
            "{}",
            render_trend(&snapshot.mean_trend, config.display.chart_width, TREND_HEIGHT)
        );
    }

    println!("═══════════════════════════════════════════════════════════");
}

/// Statistics block of the report
///
/// Every value is shown as `-` until a sample exists.
pub fn format_summary(snapshot: &Snapshot) -> String {
    let mut output = String::from("Statistics:\n");
    match snapshot.moments {
        Some(m) => {
            output.push_str(&format!("  Mean:      {:.2} ±{:.2} (95% CI)\n", m.mean, m.confidence_interval_95));
            output.push_str(&format!("  Std Dev:   {:.2}\n", m.std_dev));
            output.push_str(&format!("  Variance:  {:.2}\n", m.variance));
        }
        None => {
            output.push_str("  Mean:      -\n");
            output.push_str("  Std Dev:   -\n");
            output.push_str("  Variance:  -\n");
        }
    }
    if let Some(mode) = snapshot.histogram.mode() {
        output.push_str(&format!("  Mode:      {}\n", mode));
    }
    output.push_str(&format!("  Chi²:      {}\n", snapshot.chi_squared));
    output
}

/// Render the outcome histogram as horizontal bars
///
/// Outcomes are grouped into `rows` rows of consecutive values; bars are
/// scaled so the fullest row spans `width` characters.
pub fn render_histogram(histogram: &Histogram, rows: usize, width: usize) -> String {
    let rows = rows.clamp(1, NUM_BINS);
    let per_row = NUM_BINS.div_ceil(rows);
    let counts = histogram.counts();

    let groups: Vec<(usize, usize, u64)> = counts
        .chunks(per_row)
        .enumerate()
        .map(|(i, chunk)| {
            let first = i * per_row + 1;
            (first, first + chunk.len() - 1, chunk.iter().sum())
        })
        .collect();

    let total = histogram.total();
    let max_count = groups.iter().map(|g| g.2).max().unwrap_or(0).max(1);

    let mut output = format!("Histogram ({} samples):\n", format_number(total));
    for (first, last, count) in groups {
        let bar_len = ((count as f64 / max_count as f64) * width as f64).round() as usize;
        let percentage = if total > 0 {
            count as f64 * 100.0 / total as f64
        } else {
            0.0
        };
        let label = if first == last {
            format!("{:>7}", first)
        } else {
            format!("{:>3}-{:<3}", first, last)
        };
        output.push_str(&format!(
            "[{}] {:<width$} {:>8} ({:5.2}%)\n",
            label,
            "█".repeat(bar_len),
            count,
            percentage,
            width = width
        ));
    }
    output
}

/// Render the running-mean trend as a character plot
///
/// The vertical axis spans the series minimum to maximum; a flat series is
/// drawn along the bottom row. Each column shows the point nearest to its
/// position in the series.
pub fn render_trend(series: &[f64], width: usize, height: usize) -> String {
    if series.is_empty() || width == 0 || height == 0 {
        return String::new();
    }

    let min = series.iter().copied().fold(f64::INFINITY, f64::min);
    let max = series.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };

    let columns = width.min(series.len());
    let mut grid = vec![vec![' '; columns]; height];
    for col in 0..columns {
        let idx = if columns > 1 {
            col * (series.len() - 1) / (columns - 1)
        } else {
            series.len() - 1
        };
        let level = ((series[idx] - min) / range * (height - 1) as f64).round() as usize;
        let row = height - 1 - level.min(height - 1);
        grid[row][col] = '•';
    }

    let mut output = format!("Running mean ({} points):\n", series.len());
    for (i, row) in grid.iter().enumerate() {
        let axis = if i == 0 {
            format!("{:>7.2}", max)
        } else if i == height - 1 {
            format!("{:>7.2}", min)
        } else {
            " ".repeat(7)
        };
        let line: String = row.iter().collect();
        output.push_str(&format!("{} │{}\n", axis, line.trim_end()));
    }
    output.push_str(&format!("{} └{}\n", " ".repeat(7), "─".repeat(columns)));
    output
}
