//! CSV output formatting
//!
//! Two exports, both readable by pandas, R or a spreadsheet:
//! - Live progress series: one row per live update while the run is driven
//! - Histogram: observed and expected count per outcome after the run

use crate::distribution::{DistributionSpec, MIN_OUTCOME};
use crate::stats::fit::expected_frequencies;
use crate::stats::histogram::Histogram;
use crate::stats::live::LiveProgress;
use crate::Result;
use anyhow::Context;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV writer for the live progress series
pub struct ProgressCsvWriter {
    writer: BufWriter<File>,
    rows: u64,
}

impl ProgressCsvWriter {
    /// Create the file and write the header row
    pub fn new(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create CSV output: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "{}", LiveProgress::csv_header())?;

        Ok(Self { writer, rows: 0 })
    }

    /// Append the tracker's current update
    pub fn append(&mut self, live: &LiveProgress) -> Result<()> {
        writeln!(self.writer, "{}", live.to_csv())?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far (header excluded)
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush buffered rows to disk
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Write observed and expected counts for every outcome
///
/// The `expected` column is left empty when expectations are undefined for
/// the distribution or no distribution is known.
pub fn write_histogram_csv(
    path: &Path,
    histogram: &Histogram,
    distribution: Option<&DistributionSpec>,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create histogram CSV: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    let expected = distribution.and_then(|spec| expected_frequencies(spec, histogram.total()).ok());

    writeln!(writer, "outcome,observed,expected")?;
    for (i, &observed) in histogram.counts().iter().enumerate() {
        let outcome = MIN_OUTCOME + i as u32;
        match expected {
            Some(ref e) => writeln!(writer, "{},{},{:.6}", outcome, observed, e.as_slice()[i])?,
            None => writeln!(writer, "{},{},", outcome, observed)?,
        }
    }
    writer.flush()?;
    log::info!("Wrote histogram CSV to {}", path.display());

    Ok(())
}
