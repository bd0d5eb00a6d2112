//! Filter configuration.
//!
//! Each signal kind is filtered either by include/exclude match properties or by a list of conditions, never both:
//!
//! ```yaml
//! logs:
//!   exclude:
//!     match_type: strict
//!     record_attributes:
//!       - key: host.name
//!         value: canary-1
//! traces:
//!   span:
//!     - 'attributes["http.route"] == "/healthz"'
//!   spanevent:
//!     - 'name == "cache.miss"'
//! ```
//!
//! The `spans` section holds match properties for spans, while the `traces` section holds span and span event
//! conditions. The two are mutually exclusive in the same way as the other signal kinds.

use ottl::{ConditionSequence, EvalContextFamily};
use serde::Deserialize;
use tracing::debug;

use crate::contexts::{DataPointFamily, LogRecordFamily, MetricFamily, SpanEventFamily, SpanFamily};
use crate::error::{ConfigError, ConfigurationErrors};
use crate::processor::{FilterProcessor, LogsFilter, MetricsFilter, TracesFilter};
use crate::properties::logs::{LogMatchConfig, LogMatcher};
use crate::properties::metrics::{MetricMatchConfig, MetricMatcher};
use crate::properties::spans::{SpanMatchConfig, SpanMatcher};
use crate::properties::IncludeExclude;

/// Filter configuration for every signal kind.
///
/// A signal kind with nothing configured passes through the processor untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfiguration {
    /// Metric and data point filters.
    #[serde(default)]
    pub metrics: MetricFilters,

    /// Log record filters.
    #[serde(default)]
    pub logs: LogFilters,

    /// Span match properties.
    #[serde(default)]
    pub spans: SpanFilters,

    /// Span and span event conditions.
    #[serde(default)]
    pub traces: TraceFilters,
}

/// Metric filters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricFilters {
    /// Metrics to keep.
    #[serde(default)]
    pub include: Option<MetricMatchConfig>,

    /// Metrics to drop.
    #[serde(default)]
    pub exclude: Option<MetricMatchConfig>,

    /// Conditions that drop a metric when any holds.
    #[serde(default)]
    pub metric: Option<Vec<String>>,

    /// Conditions that drop a data point when any holds.
    #[serde(default)]
    pub datapoint: Option<Vec<String>>,
}

/// Log record filters.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogFilters {
    /// Log records to keep.
    #[serde(default)]
    pub include: Option<LogMatchConfig>,

    /// Log records to drop.
    #[serde(default)]
    pub exclude: Option<LogMatchConfig>,

    /// Conditions that drop a log record when any holds.
    #[serde(default)]
    pub log_record: Option<Vec<String>>,
}

/// Span match properties.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpanFilters {
    /// Spans to keep.
    #[serde(default)]
    pub include: Option<SpanMatchConfig>,

    /// Spans to drop.
    #[serde(default)]
    pub exclude: Option<SpanMatchConfig>,
}

/// Span and span event conditions.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceFilters {
    /// Conditions that drop a span when any holds.
    #[serde(default)]
    pub span: Option<Vec<String>>,

    /// Conditions that drop a span event when any holds.
    #[serde(default)]
    pub spanevent: Option<Vec<String>>,
}

impl FilterConfiguration {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// If any pattern, attribute matcher, severity or condition is invalid, or if match properties and conditions are
    /// both configured for the same signal kind, every such problem is returned together.
    pub fn validate(&self) -> Result<(), ConfigurationErrors> {
        self.build().map(|_| ())
    }

    /// Compiles the configuration into a processor.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`validate`](Self::validate).
    pub fn build(&self) -> Result<FilterProcessor, ConfigurationErrors> {
        let mut errors = Vec::new();

        let metrics = self.metrics.compile(&mut errors);
        let logs = self.logs.compile(&mut errors);
        let traces = compile_traces(&self.spans, &self.traces, &mut errors);

        ConfigurationErrors::from_errors(errors)?;

        let processor = FilterProcessor::new(metrics, logs, traces);
        let (metrics, logs, traces) = processor.modes();
        debug!(metrics, logs, traces, "Built filter processor.");

        Ok(processor)
    }
}

impl MetricFilters {
    fn has_properties(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }

    fn has_conditions(&self) -> bool {
        self.metric.is_some() || self.datapoint.is_some()
    }

    fn compile(&self, errors: &mut Vec<ConfigError>) -> Option<MetricsFilter> {
        if self.has_properties() && self.has_conditions() {
            errors.push(ConfigError::MutuallyExclusive { signal: "metrics" });
        }

        let include = self
            .include
            .as_ref()
            .and_then(|config| MetricMatcher::compile("metrics.include", config, errors));
        let exclude = self
            .exclude
            .as_ref()
            .and_then(|config| MetricMatcher::compile("metrics.exclude", config, errors));
        let metric = conditions::<MetricFamily>("metrics.metric", self.metric.as_deref(), errors);
        let data_point = conditions::<DataPointFamily>("metrics.datapoint", self.datapoint.as_deref(), errors);

        if self.has_properties() {
            Some(MetricsFilter::Properties(IncludeExclude::new(include, exclude)))
        } else if self.has_conditions() {
            Some(MetricsFilter::Conditions { metric, data_point })
        } else {
            None
        }
    }
}

impl LogFilters {
    fn has_properties(&self) -> bool {
        self.include.is_some() || self.exclude.is_some()
    }

    fn compile(&self, errors: &mut Vec<ConfigError>) -> Option<LogsFilter> {
        if self.has_properties() && self.log_record.is_some() {
            errors.push(ConfigError::MutuallyExclusive { signal: "logs" });
        }

        let include = self
            .include
            .as_ref()
            .and_then(|config| LogMatcher::compile("logs.include", config, errors));
        let exclude = self
            .exclude
            .as_ref()
            .and_then(|config| LogMatcher::compile("logs.exclude", config, errors));
        let log_record = conditions::<LogRecordFamily>("logs.log_record", self.log_record.as_deref(), errors);

        if self.has_properties() {
            Some(LogsFilter::Properties(IncludeExclude::new(include, exclude)))
        } else {
            log_record.map(LogsFilter::Conditions)
        }
    }
}

fn compile_traces(spans: &SpanFilters, traces: &TraceFilters, errors: &mut Vec<ConfigError>) -> Option<TracesFilter> {
    let has_properties = spans.include.is_some() || spans.exclude.is_some();
    let has_conditions = traces.span.is_some() || traces.spanevent.is_some();
    if has_properties && has_conditions {
        errors.push(ConfigError::MutuallyExclusive { signal: "spans" });
    }

    let include = spans
        .include
        .as_ref()
        .and_then(|config| SpanMatcher::compile("spans.include", config, errors));
    let exclude = spans
        .exclude
        .as_ref()
        .and_then(|config| SpanMatcher::compile("spans.exclude", config, errors));
    let span = conditions::<SpanFamily>("traces.span", traces.span.as_deref(), errors);
    let span_event = conditions::<SpanEventFamily>("traces.spanevent", traces.spanevent.as_deref(), errors);

    if has_properties {
        Some(TracesFilter::Properties(IncludeExclude::new(include, exclude)))
    } else if has_conditions {
        Some(TracesFilter::Conditions { span, span_event })
    } else {
        None
    }
}

/// Parses a condition list, appending one error per failing condition.
pub(crate) fn conditions<F: EvalContextFamily>(
    location: &'static str, statements: Option<&[String]>, errors: &mut Vec<ConfigError>,
) -> Option<ConditionSequence<F>> {
    match ConditionSequence::parse(statements?) {
        Ok(sequence) => Some(sequence),
        Err(failures) => {
            errors.extend(
                failures
                    .into_iter()
                    .map(|source| ConfigError::InvalidCondition { location, source }),
            );
            None
        }
    }
}
