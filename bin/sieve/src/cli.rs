use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(about, version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub action: Action,
}

#[derive(Subcommand)]
pub enum Action {
    /// Validate a filter configuration, reporting every problem found.
    Validate(ValidateArgs),

    /// Filter one batch of telemetry.
    Filter(FilterArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Path to the filter configuration file.
    #[arg(short = 'c', long)]
    pub config: PathBuf,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Path to the filter configuration file.
    #[arg(short = 'c', long)]
    pub config: PathBuf,

    /// Kind of telemetry in the input batch.
    #[arg(short = 's', long, value_enum)]
    pub signal: SignalKind,

    /// Path to the input batch, as JSON.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Where to write the filtered batch. Defaults to standard output.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SignalKind {
    Logs,
    Metrics,
    Traces,
}
