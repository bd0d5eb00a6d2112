#![allow(dead_code)]

use sieve_data::logs::{LogRecord, LogsBatch, ResourceLogs, ScopeLogs};
use sieve_data::metrics::{DataPoint, DataPointValue, Metric, MetricType, MetricsBatch, ResourceMetrics, ScopeMetrics};
use sieve_data::traces::{ResourceSpans, ScopeSpans, Span, TracesBatch};
use sieve_data::{Attributes, InstrumentationScope, Resource};
use sieve_filter::{FilterConfiguration, FilterProcessor, Telemetry};

pub fn configuration(yaml: &str) -> FilterConfiguration {
    serde_yaml::from_str(yaml).expect("configuration should deserialize")
}

pub fn processor(yaml: &str) -> FilterProcessor {
    configuration(yaml)
        .build()
        .expect("configuration should be valid")
        .with_telemetry(Telemetry::noop())
}

pub fn resource(host: &str) -> Resource {
    Resource::new(Attributes::from_iter([("host.name", host)]))
}

pub fn logs(resources: Vec<(Resource, Vec<(&str, Vec<LogRecord>)>)>) -> LogsBatch {
    LogsBatch::new(
        resources
            .into_iter()
            .map(|(resource, scopes)| {
                let scopes = scopes
                    .into_iter()
                    .map(|(scope, records)| ScopeLogs::new(InstrumentationScope::new(scope), records))
                    .collect();
                ResourceLogs::new(resource, scopes)
            })
            .collect(),
    )
}

pub fn spans(resources: Vec<(Resource, Vec<(&str, Vec<Span>)>)>) -> TracesBatch {
    TracesBatch::new(
        resources
            .into_iter()
            .map(|(resource, scopes)| {
                let scopes = scopes
                    .into_iter()
                    .map(|(scope, spans)| ScopeSpans::new(InstrumentationScope::new(scope), spans))
                    .collect();
                ResourceSpans::new(resource, scopes)
            })
            .collect(),
    )
}

pub fn metrics(resources: Vec<(Resource, Vec<Metric>)>) -> MetricsBatch {
    MetricsBatch::new(
        resources
            .into_iter()
            .map(|(resource, metrics)| {
                ResourceMetrics::new(resource, vec![ScopeMetrics::new(InstrumentationScope::new("meter"), metrics)])
            })
            .collect(),
    )
}

pub fn gauge(name: &str, values: &[f64]) -> Metric {
    Metric::new(name, MetricType::Gauge).with_data_points(
        values
            .iter()
            .map(|value| DataPoint::new(DataPointValue::Double(*value)))
            .collect(),
    )
}
