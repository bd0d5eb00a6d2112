use metrics::{counter, Counter};

const RECEIVED: &str = "filter_items_received_total";
const DROPPED: &str = "filter_items_dropped_total";

/// Telemetry item kinds counted separately.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Signal {
    /// Metrics.
    Metrics,
    /// Data points.
    DataPoints,
    /// Log records.
    Logs,
    /// Spans.
    Spans,
    /// Span events.
    SpanEvents,
}

impl Signal {
    /// Returns the `signal` label value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Signal::Metrics => "metrics",
            Signal::DataPoints => "datapoints",
            Signal::Logs => "logs",
            Signal::Spans => "spans",
            Signal::SpanEvents => "spanevents",
        }
    }
}

#[derive(Clone)]
struct SignalCounters {
    received: Counter,
    dropped: Counter,
}

impl SignalCounters {
    fn register(signal: Signal) -> Self {
        Self {
            received: counter!(RECEIVED, "signal" => signal.as_str()),
            dropped: counter!(DROPPED, "signal" => signal.as_str()),
        }
    }

    fn noop() -> Self {
        Self {
            received: Counter::noop(),
            dropped: Counter::noop(),
        }
    }
}

/// Counters for items seen and dropped by the filter processor.
#[derive(Clone)]
pub struct Telemetry {
    metrics: SignalCounters,
    data_points: SignalCounters,
    logs: SignalCounters,
    spans: SignalCounters,
    span_events: SignalCounters,
}

impl Telemetry {
    /// Registers the counters with the global recorder.
    pub fn new() -> Self {
        Self {
            metrics: SignalCounters::register(Signal::Metrics),
            data_points: SignalCounters::register(Signal::DataPoints),
            logs: SignalCounters::register(Signal::Logs),
            spans: SignalCounters::register(Signal::Spans),
            span_events: SignalCounters::register(Signal::SpanEvents),
        }
    }

    /// Creates counters that record nothing.
    pub fn noop() -> Self {
        Self {
            metrics: SignalCounters::noop(),
            data_points: SignalCounters::noop(),
            logs: SignalCounters::noop(),
            spans: SignalCounters::noop(),
            span_events: SignalCounters::noop(),
        }
    }

    fn counters(&self, signal: Signal) -> &SignalCounters {
        match signal {
            Signal::Metrics => &self.metrics,
            Signal::DataPoints => &self.data_points,
            Signal::Logs => &self.logs,
            Signal::Spans => &self.spans,
            Signal::SpanEvents => &self.span_events,
        }
    }

    /// Records `received` items seen and `dropped` items removed for one batch.
    pub fn record(&self, signal: Signal, received: usize, dropped: usize) {
        let counters = self.counters(signal);
        counters.received.increment(received as u64);
        counters.dropped.increment(dropped as u64);
    }
}

#[cfg(test)]
mod tests {
    use metrics_util::debugging::{DebugValue, DebuggingRecorder};

    use super::*;

    #[test]
    fn counters_are_labeled_by_signal() {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();

        let telemetry = metrics::with_local_recorder(&recorder, Telemetry::new);
        telemetry.record(Signal::Logs, 10, 3);
        telemetry.record(Signal::Logs, 5, 0);
        telemetry.record(Signal::Spans, 2, 2);

        let snapshot = snapshotter.snapshot().into_vec();
        let counter = |name: &str, signal: &str| {
            snapshot
                .iter()
                .find(|(key, _, _, _)| {
                    key.key().name() == name
                        && key
                            .key()
                            .labels()
                            .any(|label| label.key() == "signal" && label.value() == signal)
                })
                .map(|(_, _, _, value)| match value {
                    DebugValue::Counter(v) => DebugValue::Counter(*v),
                    DebugValue::Gauge(v) => DebugValue::Gauge(*v),
                    DebugValue::Histogram(v) => DebugValue::Histogram(v.clone()),
                })
        };

        assert_eq!(counter(RECEIVED, "logs"), Some(DebugValue::Counter(15)));
        assert_eq!(counter(DROPPED, "logs"), Some(DebugValue::Counter(3)));
        assert_eq!(counter(RECEIVED, "spans"), Some(DebugValue::Counter(2)));
        assert_eq!(counter(DROPPED, "spans"), Some(DebugValue::Counter(2)));
    }
}
