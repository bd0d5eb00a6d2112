//! Telemetry filtering.
//!
//! A [`FilterProcessor`] drops metrics, data points, log records, spans and span events from telemetry batches. Each
//! signal kind is filtered in one of two ways:
//!
//! - match properties: an `include` and/or `exclude` block of static predicates (name patterns, attribute matchers,
//!   severities). An item is kept if it matches `include` and does not match `exclude`.
//! - conditions: a list of condition expressions (see the [`ottl`] crate). An item is dropped if any condition holds.
//!
//! Everything is compiled and validated up front by [`FilterConfiguration::build`], which reports every problem in
//! the configuration at once. Once built, filtering a batch cannot fail.

#![deny(missing_docs)]

pub mod attributes;

mod config;
pub use self::config::{FilterConfiguration, LogFilters, MetricFilters, SpanFilters, TraceFilters};

mod contexts;
pub use self::contexts::{
    DataPointContext, DataPointFamily, LogRecordContext, LogRecordFamily, MetricContext, MetricFamily, SpanContext,
    SpanEventContext, SpanEventFamily, SpanFamily,
};

mod error;
pub use self::error::{ConfigError, ConfigurationErrors};

pub mod filterset;

mod processor;
pub use self::processor::{Capabilities, FilterProcessor};

pub mod properties;

mod severity;
pub use self::severity::parse_severity;

mod telemetry;
pub use self::telemetry::{Signal, Telemetry};
