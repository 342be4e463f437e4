//! SamplePulse CLI entry point

use anyhow::{Context, Result};
use samplepulse::config::cli::Cli;
use samplepulse::config::{toml as config_toml, validator, SimConfig};
use samplepulse::output::{csv, json, text};
use samplepulse::runner::{self, RunOutcome};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();
    init_logging(cli.debug);
    cli.validate()?;

    // Build configuration: TOML file (if any) overridden by CLI flags
    let config = config_toml::load_config(&cli)?;

    validator::validate_config(&config).context("Configuration validation failed")?;

    if cli.print_config {
        print!("{}", config_toml::to_toml_string(&config)?);
        return Ok(());
    }

    println!("SamplePulse v{}", env!("CARGO_PKG_VERSION"));
    println!();
    print_configuration(&config);

    if cli.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Starting run...");
    println!();

    let outcome = runner::run(&config)?;

    println!();
    text::print_results(&outcome.snapshot, outcome.elapsed, &config);

    write_outputs(&outcome, &config)
}

/// Initialise env_logger; `--debug` overrides `RUST_LOG`
fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if debug {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn print_configuration(config: &SimConfig) {
    println!("Configuration:");
    for line in config.to_string().lines() {
        println!("  {}", line);
    }
}

fn write_outputs(outcome: &RunOutcome, config: &SimConfig) -> Result<()> {
    if let Some(ref path) = config.output.json_output {
        let report = json::JsonReport::build(&outcome.snapshot, outcome.elapsed, config);
        json::write_json_output(path, &report, true)?;
        println!("JSON report written to: {}", path.display());
    }

    if let Some(ref path) = config.output.histogram_csv {
        csv::write_histogram_csv(path, &outcome.snapshot.histogram, outcome.snapshot.distribution.as_ref())?;
        println!("Histogram CSV written to: {}", path.display());
    }

    if let Some(ref path) = config.output.csv_output {
        println!("Progress CSV written to: {}", path.display());
    }

    Ok(())
}
