use std::mem;

use ottl::ConditionSequence;
use sieve_data::logs::{LogRecord, LogsBatch};
use sieve_data::metrics::{Metric, MetricsBatch};
use sieve_data::traces::{Span, TracesBatch};
use sieve_data::{InstrumentationScope, Resource};
use tracing::trace;

use crate::contexts::{
    DataPointContext, DataPointFamily, LogRecordContext, LogRecordFamily, MetricContext, MetricFamily,
    SpanContext, SpanEventContext, SpanEventFamily, SpanFamily,
};
use crate::properties::logs::LogMatcher;
use crate::properties::metrics::MetricMatcher;
use crate::properties::spans::SpanMatcher;
use crate::properties::IncludeExclude;
use crate::telemetry::{Signal, Telemetry};

const PASSTHROUGH: &str = "passthrough";
const PROPERTIES: &str = "properties";
const CONDITIONS: &str = "conditions";

/// What the processor does to the data it is given.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Capabilities {
    /// Whether batches are modified in place.
    pub mutates_data: bool,
}

pub(crate) enum MetricsFilter {
    Properties(IncludeExclude<MetricMatcher>),
    Conditions {
        metric: Option<ConditionSequence<MetricFamily>>,
        data_point: Option<ConditionSequence<DataPointFamily>>,
    },
}

impl MetricsFilter {
    fn mode(&self) -> &'static str {
        match self {
            MetricsFilter::Properties(_) => PROPERTIES,
            MetricsFilter::Conditions { .. } => CONDITIONS,
        }
    }

    /// Filters one metric's data points, then decides whether the metric itself is kept.
    fn keep(&self, metric: &mut Metric, scope: &InstrumentationScope, resource: &Resource) -> bool {
        match self {
            MetricsFilter::Properties(properties) => {
                let metric = &*metric;
                properties.keep(|matcher| matcher.matches(metric, scope, resource))
            }
            MetricsFilter::Conditions { metric: conditions, data_point } => {
                if let Some(conditions) = conditions {
                    if conditions.evaluate(&MetricContext { metric, scope, resource }) {
                        trace!(metric_name = metric.name(), "Dropping metric.");
                        return false;
                    }
                }

                let Some(data_point_conditions) = data_point else {
                    return true;
                };

                let mut data_points = mem::take(metric.data_points_mut());
                data_points.retain(|data_point| {
                    !data_point_conditions.evaluate(&DataPointContext {
                        data_point,
                        metric,
                        scope,
                        resource,
                    })
                });
                let emptied = data_points.is_empty();
                *metric.data_points_mut() = data_points;

                if emptied {
                    trace!(metric_name = metric.name(), "Dropping metric with no remaining data points.");
                }
                !emptied
            }
        }
    }
}

pub(crate) enum LogsFilter {
    Properties(IncludeExclude<LogMatcher>),
    Conditions(ConditionSequence<LogRecordFamily>),
}

impl LogsFilter {
    fn mode(&self) -> &'static str {
        match self {
            LogsFilter::Properties(_) => PROPERTIES,
            LogsFilter::Conditions(_) => CONDITIONS,
        }
    }

    fn keep(&self, record: &LogRecord, scope: &InstrumentationScope, resource: &Resource) -> bool {
        match self {
            LogsFilter::Properties(properties) => properties.keep(|matcher| matcher.matches(record, resource)),
            LogsFilter::Conditions(conditions) => !conditions.evaluate(&LogRecordContext {
                record,
                scope,
                resource,
            }),
        }
    }
}

pub(crate) enum TracesFilter {
    Properties(IncludeExclude<SpanMatcher>),
    Conditions {
        span: Option<ConditionSequence<SpanFamily>>,
        span_event: Option<ConditionSequence<SpanEventFamily>>,
    },
}

impl TracesFilter {
    fn mode(&self) -> &'static str {
        match self {
            TracesFilter::Properties(_) => PROPERTIES,
            TracesFilter::Conditions { .. } => CONDITIONS,
        }
    }

    /// Decides whether the span is kept and, if so, filters its events.
    ///
    /// Span events are filtered independently: dropping every event never drops the span.
    fn keep(&self, span: &mut Span, scope: &InstrumentationScope, resource: &Resource) -> bool {
        match self {
            TracesFilter::Properties(properties) => {
                let span = &*span;
                properties.keep(|matcher| matcher.matches(span, resource, scope))
            }
            TracesFilter::Conditions {
                span: conditions,
                span_event,
            } => {
                if let Some(conditions) = conditions {
                    if conditions.evaluate(&SpanContext { span, scope, resource }) {
                        trace!(span_name = span.name(), "Dropping span.");
                        return false;
                    }
                }

                if let Some(span_event_conditions) = span_event {
                    let mut events = mem::take(span.events_mut());
                    events.retain(|event| {
                        !span_event_conditions.evaluate(&SpanEventContext {
                            event,
                            span,
                            scope,
                            resource,
                        })
                    });
                    *span.events_mut() = events;
                }
                true
            }
        }
    }
}

/// Drops metrics, data points, log records, spans and span events from telemetry batches.
///
/// The processor is built from a [`FilterConfiguration`](crate::FilterConfiguration) and is immutable afterwards, so a
/// single instance can filter batches from many threads at once. Filtering removes items without touching the
/// content of the items that survive, and never fails.
///
/// After items are removed, any scope left with no items is removed, and then any resource left with no scopes.
/// Everything that survives keeps its original order.
pub struct FilterProcessor {
    metrics: Option<MetricsFilter>,
    logs: Option<LogsFilter>,
    traces: Option<TracesFilter>,
    telemetry: Telemetry,
}

impl FilterProcessor {
    pub(crate) fn new(metrics: Option<MetricsFilter>, logs: Option<LogsFilter>, traces: Option<TracesFilter>) -> Self {
        Self {
            metrics,
            logs,
            traces,
            telemetry: Telemetry::new(),
        }
    }

    /// Replaces the counters used to report received and dropped items.
    pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Returns the capabilities of this processor.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities { mutates_data: true }
    }

    /// Returns the filtering mode for metrics, logs and traces, in that order.
    pub(crate) fn modes(&self) -> (&'static str, &'static str, &'static str) {
        (
            self.metrics.as_ref().map_or(PASSTHROUGH, MetricsFilter::mode),
            self.logs.as_ref().map_or(PASSTHROUGH, LogsFilter::mode),
            self.traces.as_ref().map_or(PASSTHROUGH, TracesFilter::mode),
        )
    }

    /// Filters metrics and their data points in place.
    pub fn filter_metrics(&self, batch: &mut MetricsBatch) {
        let Some(filter) = &self.metrics else {
            return;
        };

        let metrics_received = batch.metric_count();
        let data_points_received = batch.data_point_count();

        batch.resource_metrics_mut().retain_mut(|resource_metrics| {
            let (resource, scope_metrics) = resource_metrics.split_mut();
            scope_metrics.retain_mut(|scope_metrics| {
                let (scope, metrics) = scope_metrics.split_mut();
                metrics.retain_mut(|metric| filter.keep(metric, scope, resource));
                !metrics.is_empty()
            });
            !scope_metrics.is_empty()
        });

        let metrics_dropped = metrics_received - batch.metric_count();
        let data_points_dropped = data_points_received - batch.data_point_count();
        self.telemetry.record(Signal::Metrics, metrics_received, metrics_dropped);
        self.telemetry
            .record(Signal::DataPoints, data_points_received, data_points_dropped);
        trace!(
            signal = Signal::Metrics.as_str(),
            received = metrics_received,
            dropped = metrics_dropped,
            data_points_dropped,
            "Filtered batch."
        );
    }

    /// Filters log records in place.
    pub fn filter_logs(&self, batch: &mut LogsBatch) {
        let Some(filter) = &self.logs else {
            return;
        };

        let received = batch.log_record_count();

        batch.resource_logs_mut().retain_mut(|resource_logs| {
            let (resource, scope_logs) = resource_logs.split_mut();
            scope_logs.retain_mut(|scope_logs| {
                let (scope, records) = scope_logs.split_mut();
                records.retain(|record| filter.keep(record, scope, resource));
                !records.is_empty()
            });
            !scope_logs.is_empty()
        });

        let dropped = received - batch.log_record_count();
        self.telemetry.record(Signal::Logs, received, dropped);
        trace!(signal = Signal::Logs.as_str(), received, dropped, "Filtered batch.");
    }

    /// Filters spans, and the span events of surviving spans, in place.
    pub fn filter_traces(&self, batch: &mut TracesBatch) {
        let Some(filter) = &self.traces else {
            return;
        };

        let spans_received = batch.span_count();
        let events_received = span_event_count(batch);

        batch.resource_spans_mut().retain_mut(|resource_spans| {
            let (resource, scope_spans) = resource_spans.split_mut();
            scope_spans.retain_mut(|scope_spans| {
                let (scope, spans) = scope_spans.split_mut();
                spans.retain_mut(|span| filter.keep(span, scope, resource));
                !spans.is_empty()
            });
            !scope_spans.is_empty()
        });

        let spans_dropped = spans_received - batch.span_count();
        let events_dropped = events_received - span_event_count(batch);
        self.telemetry.record(Signal::Spans, spans_received, spans_dropped);
        self.telemetry.record(Signal::SpanEvents, events_received, events_dropped);
        trace!(
            signal = Signal::Spans.as_str(),
            received = spans_received,
            dropped = spans_dropped,
            span_events_dropped = events_dropped,
            "Filtered batch."
        );
    }
}

fn span_event_count(batch: &TracesBatch) -> usize {
    batch
        .resource_spans()
        .iter()
        .flat_map(|resource_spans| resource_spans.scope_spans())
        .flat_map(|scope_spans| scope_spans.spans())
        .map(|span| span.events().len())
        .sum()
}
