use anyhow::Context as _;
use figment::providers::Env;
use figment::Figment;
use serde::Deserialize;
use tracing_subscriber::{fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter, Layer as _};

use crate::config::{ENV_PREFIX, LOGGING_KEYS};

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize)]
struct LoggingConfiguration {
    #[serde(default = "default_log_level")]
    log_level: String,

    #[serde(default)]
    log_format_json: bool,
}

/// Initializes logging from `SIEVE_LOG_LEVEL` and `SIEVE_LOG_FORMAT_JSON`.
///
/// Logs are written to standard error, leaving standard output for filtered batches.
pub fn initialize_logging() -> anyhow::Result<()> {
    let config: LoggingConfiguration = Figment::from(Env::prefixed(ENV_PREFIX).only(&LOGGING_KEYS))
        .extract()
        .context("Failed to read logging configuration.")?;

    let filter = EnvFilter::builder()
        .parse(&config.log_level)
        .with_context(|| format!("Failed to parse log level '{}'.", config.log_level))?;

    let layer = if config.log_format_json {
        fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .context("Failed to install log subscriber.")
}
