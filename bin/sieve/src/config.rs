use std::path::Path;

use anyhow::Context as _;
use figment::providers::{Env, Format as _, Yaml};
use figment::value::UncasedStr;
use figment::Figment;
use sieve_filter::FilterConfiguration;

/// Prefix of environment variables read by `sieve`.
pub const ENV_PREFIX: &str = "SIEVE_";

/// Environment variables under [`ENV_PREFIX`] that configure logging rather than filtering.
pub const LOGGING_KEYS: [&str; 2] = ["log_level", "log_format_json"];

/// Top-level configuration sections that environment variables may override.
const SECTIONS: [&str; 4] = ["metrics", "logs", "spans", "traces"];

/// Loads the filter configuration from a YAML file, with overrides from the environment.
///
/// Nested keys are separated by a double underscore: `SIEVE_LOGS__INCLUDE__MATCH_TYPE=regexp` overrides
/// `logs.include.match_type`. Variables outside the filter sections, such as [`LOGGING_KEYS`], are not read here.
pub fn load(path: &Path) -> anyhow::Result<FilterConfiguration> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: &Path, prefix: &str) -> anyhow::Result<FilterConfiguration> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'.", path.display()))?;

    Figment::new()
        .merge(Yaml::string(&contents))
        .merge(Env::prefixed(prefix).filter(is_filter_key).split("__"))
        .extract()
        .with_context(|| format!("Failed to parse configuration file '{}'.", path.display()))
}

fn is_filter_key(key: &UncasedStr) -> bool {
    let section = key.as_str().split("__").next().unwrap_or_default();
    SECTIONS.iter().any(|known| section.eq_ignore_ascii_case(known))
}
