//! Frame loop driving a single run
//!
//! The scheduler never reads a clock itself. The runner owns a
//! [`RunClock`], calls [`SampleScheduler::tick`] once per frame and sleeps
//! for `frame_ms` between frames, publishing live progress on the way.
//!
//! # Example
//!
//! ```
//! use samplepulse::config::SimConfig;
//! use samplepulse::runner::run;
//! use samplepulse::scheduler::RunStatus;
//!
//! let mut config = SimConfig::default();
//! config.run.samples = 200;
//! config.output.no_live = true;
//!
//! let outcome = run(&config).unwrap();
//! assert_eq!(outcome.snapshot.status, RunStatus::Completed);
//! assert_eq!(outcome.snapshot.samples_generated, 200);
//! ```

use crate::config::SimConfig;
use crate::output::csv::ProgressCsvWriter;
use crate::scheduler::snapshot::Snapshot;
use crate::scheduler::SampleScheduler;
use crate::stats::live::LiveProgress;
use crate::util::time::RunClock;
use crate::Result;
use anyhow::Context;
use log::{debug, info, warn};
use std::thread;
use std::time::Duration;

/// Final state of a driven run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Snapshot taken after the last tick
    pub snapshot: Snapshot,
    /// Wall-clock time from start to completion or cancellation
    pub elapsed: Duration,
    /// Frames driven
    pub ticks: u64,
}

/// Drive one run to completion (or `stop_after_ms`) with the given config
///
/// A configured `interval_change` is applied once, on the first frame at or
/// after its `after_ms`.
///
/// The configuration is expected to have passed
/// [`validate_config`](crate::config::validator::validate_config).
pub fn run(config: &SimConfig) -> Result<RunOutcome> {
    let request = config.run_request().context("Invalid run parameters")?;
    let mut scheduler = SampleScheduler::new(config.scheduler_settings());

    let show_live = !config.output.no_live;
    let mut live = LiveProgress::new(Duration::from_millis(config.display.live_interval_ms));
    let mut csv = match config.output.csv_output {
        Some(ref path) => Some(ProgressCsvWriter::new(path)?),
        None => None,
    };

    let frame = Duration::from_millis(config.run.frame_ms);
    let stop_after = config.run.stop_after_ms.map(Duration::from_millis);
    let mut pending_change = config.run.interval_change;

    let clock = RunClock::start();
    scheduler.start_run(request, clock.now_millis())?;

    let mut ticks = 0u64;
    loop {
        if let Some(change) = pending_change {
            if clock.elapsed() >= Duration::from_millis(change.after_ms) {
                scheduler.set_interval(change.interval_ms).context("Invalid interval change")?;
                info!("Interval set to {} ms after {} ms", change.interval_ms, change.after_ms);
                pending_change = None;
            }
        }

        scheduler.tick(clock.now_millis());
        ticks += 1;

        if let Some(limit) = stop_after {
            if clock.elapsed() >= limit && scheduler.cancel() {
                warn!("Stopping run after {:?}", limit);
            }
        }

        if !scheduler.is_running() {
            break;
        }

        if (show_live || csv.is_some()) && live.should_update() {
            publish(&mut live, &scheduler.current_snapshot(), show_live, csv.as_mut())?;
        }

        thread::sleep(frame);
    }

    let elapsed = clock.elapsed();
    let snapshot = scheduler.current_snapshot();

    if show_live || csv.is_some() {
        publish(&mut live, &snapshot, show_live, csv.as_mut())?;
    }
    if show_live {
        println!();
    }
    if let Some(ref mut writer) = csv {
        writer.flush()?;
        debug!("Wrote {} progress rows", writer.rows());
    }

    debug!("Run finished after {} frames in {:?}", ticks, elapsed);

    Ok(RunOutcome {
        snapshot,
        elapsed,
        ticks,
    })
}

fn publish(
    live: &mut LiveProgress,
    snapshot: &Snapshot,
    show_live: bool,
    csv: Option<&mut ProgressCsvWriter>,
) -> Result<()> {
    live.update(snapshot);
    if show_live {
        live.display_console();
    }
    if let Some(writer) = csv {
        writer.append(live)?;
    }
    Ok(())
}
