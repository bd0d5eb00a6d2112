//! Command-line driver for the Sieve telemetry filter.
//!
//! `sieve validate` checks a filter configuration and reports every problem in it. `sieve filter` applies a
//! configuration to one JSON-encoded batch of logs, metrics or traces and writes out what survives.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context as _};
use clap::Parser as _;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sieve_data::logs::LogsBatch;
use sieve_data::metrics::MetricsBatch;
use sieve_data::traces::TracesBatch;
use tracing::{error, info};

mod cli;
use self::cli::{Action, Cli, FilterArgs, SignalKind, ValidateArgs};

mod config;

mod logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::initialize_logging() {
        eprintln!("{:?}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        error!("{:?}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.action {
        Action::Validate(args) => validate(&args),
        Action::Filter(args) => filter(&args),
    }
}

fn validate(args: &ValidateArgs) -> anyhow::Result<()> {
    let config = config::load(&args.config)?;
    match config.validate() {
        Ok(()) => {
            info!(path = %args.config.display(), "Configuration is valid.");
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                error!("{}", error);
            }
            bail!("Configuration '{}' has {} error(s).", args.config.display(), errors.len())
        }
    }
}

fn filter(args: &FilterArgs) -> anyhow::Result<()> {
    let processor = config::load(&args.config)?
        .build()
        .context("Invalid filter configuration.")?;

    match args.signal {
        SignalKind::Logs => filter_batch(args, LogsBatch::log_record_count, |batch: &mut LogsBatch| {
            processor.filter_logs(batch)
        }),
        SignalKind::Metrics => filter_batch(args, MetricsBatch::data_point_count, |batch: &mut MetricsBatch| {
            processor.filter_metrics(batch)
        }),
        SignalKind::Traces => filter_batch(args, TracesBatch::span_count, |batch: &mut TracesBatch| {
            processor.filter_traces(batch)
        }),
    }
}

fn filter_batch<B, C, F>(args: &FilterArgs, count: C, apply: F) -> anyhow::Result<()>
where
    B: DeserializeOwned + Serialize,
    C: Fn(&B) -> usize,
    F: FnOnce(&mut B),
{
    let mut batch = read_batch::<B>(&args.input)?;
    let before = count(&batch);
    apply(&mut batch);
    let after = count(&batch);

    info!(
        signal = ?args.signal,
        received = before,
        dropped = before - after,
        "Filtered batch."
    );

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("Failed to create output file '{}'.", path.display()))?;
            write_batch(BufWriter::new(file), &batch)
        }
        None => write_batch(io::stdout().lock(), &batch),
    }
}

fn read_batch<B: DeserializeOwned>(path: &Path) -> anyhow::Result<B> {
    let file = File::open(path).with_context(|| format!("Failed to open input batch '{}'.", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to decode input batch '{}'.", path.display()))
}

fn write_batch<W: Write, B: Serialize>(mut writer: W, batch: &B) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut writer, batch).context("Failed to encode filtered batch.")?;
    writeln!(writer)?;
    writer.flush().context("Failed to write filtered batch.")
}
