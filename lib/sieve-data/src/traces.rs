//! Traces.

use serde::{Deserialize, Serialize};

use crate::{Attributes, InstrumentationScope, Resource, SpanId, TraceId};

/// Span kind.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanKind {
    /// Unspecified kind.
    #[default]
    Unspecified,
    /// Internal operation within an application.
    Internal,
    /// Server-side handling of a remote request.
    Server,
    /// Client-side of a remote request.
    Client,
    /// Producer of an asynchronous message.
    Producer,
    /// Consumer of an asynchronous message.
    Consumer,
}

impl SpanKind {
    /// Returns the numeric value of this kind.
    pub const fn as_i64(&self) -> i64 {
        match self {
            SpanKind::Unspecified => 0,
            SpanKind::Internal => 1,
            SpanKind::Server => 2,
            SpanKind::Client => 3,
            SpanKind::Producer => 4,
            SpanKind::Consumer => 5,
        }
    }

    /// Returns the canonical name of this kind, such as `SPAN_KIND_SERVER`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SpanKind::Unspecified => "SPAN_KIND_UNSPECIFIED",
            SpanKind::Internal => "SPAN_KIND_INTERNAL",
            SpanKind::Server => "SPAN_KIND_SERVER",
            SpanKind::Client => "SPAN_KIND_CLIENT",
            SpanKind::Producer => "SPAN_KIND_PRODUCER",
            SpanKind::Consumer => "SPAN_KIND_CONSUMER",
        }
    }
}

/// Span status code.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    /// Status was not set.
    #[default]
    Unset,
    /// Operation completed successfully.
    Ok,
    /// Operation failed.
    Error,
}

impl StatusCode {
    /// Returns the numeric value of this status code.
    pub const fn as_i64(&self) -> i64 {
        match self {
            StatusCode::Unset => 0,
            StatusCode::Ok => 1,
            StatusCode::Error => 2,
        }
    }
}

/// Span status.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    code: StatusCode,
    message: String,
}

impl Status {
    /// Creates a new `Status`.
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns the status code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// Returns the status message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A timestamped event recorded during a span.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpanEvent {
    time_unix_nano: u64,
    name: String,
    attributes: Attributes,
    dropped_attributes_count: u32,
}

impl SpanEvent {
    /// Creates a new `SpanEvent` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the event timestamp.
    pub fn with_time_unix_nano(mut self, time_unix_nano: u64) -> Self {
        self.time_unix_nano = time_unix_nano;
        self
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Returns the event timestamp.
    pub fn time_unix_nano(&self) -> u64 {
        self.time_unix_nano
    }

    /// Returns the event name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the number of attributes that were discarded upstream.
    pub fn dropped_attributes_count(&self) -> u32 {
        self.dropped_attributes_count
    }
}

/// A span.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    trace_id: TraceId,
    span_id: SpanId,
    parent_span_id: SpanId,
    trace_state: String,
    name: String,
    kind: SpanKind,
    start_time_unix_nano: u64,
    end_time_unix_nano: u64,
    attributes: Attributes,
    dropped_attributes_count: u32,
    events: Vec<SpanEvent>,
    status: Status,
}

impl Span {
    /// Creates a new `Span` with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the trace, span, and parent span identifiers.
    pub fn with_ids(mut self, trace_id: TraceId, span_id: SpanId, parent_span_id: SpanId) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self.parent_span_id = parent_span_id;
        self
    }

    /// Sets the W3C trace state.
    pub fn with_trace_state(mut self, trace_state: impl Into<String>) -> Self {
        self.trace_state = trace_state.into();
        self
    }

    /// Sets the span kind.
    pub fn with_kind(mut self, kind: SpanKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the start and end timestamps.
    pub fn with_timestamps(mut self, start_time_unix_nano: u64, end_time_unix_nano: u64) -> Self {
        self.start_time_unix_nano = start_time_unix_nano;
        self.end_time_unix_nano = end_time_unix_nano;
        self
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the span events.
    pub fn with_events(mut self, events: Vec<SpanEvent>) -> Self {
        self.events = events;
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Returns the trace identifier.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Returns the span identifier.
    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }

    /// Returns the parent span identifier.
    pub fn parent_span_id(&self) -> &SpanId {
        &self.parent_span_id
    }

    /// Returns the W3C trace state.
    pub fn trace_state(&self) -> &str {
        &self.trace_state
    }

    /// Returns the span name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the span kind.
    pub fn kind(&self) -> SpanKind {
        self.kind
    }

    /// Returns the start timestamp.
    pub fn start_time_unix_nano(&self) -> u64 {
        self.start_time_unix_nano
    }

    /// Returns the end timestamp.
    pub fn end_time_unix_nano(&self) -> u64 {
        self.end_time_unix_nano
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the number of attributes that were discarded upstream.
    pub fn dropped_attributes_count(&self) -> u32 {
        self.dropped_attributes_count
    }

    /// Returns the span events.
    pub fn events(&self) -> &[SpanEvent] {
        &self.events
    }

    /// Returns a mutable reference to the span events.
    pub fn events_mut(&mut self) -> &mut Vec<SpanEvent> {
        &mut self.events
    }

    /// Returns the status.
    pub fn status(&self) -> &Status {
        &self.status
    }
}

/// Spans emitted by a single instrumentation scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeSpans {
    scope: InstrumentationScope,
    spans: Vec<Span>,
}

impl ScopeSpans {
    /// Creates a new `ScopeSpans`.
    pub fn new(scope: InstrumentationScope, spans: Vec<Span>) -> Self {
        Self { scope, spans }
    }

    /// Returns the instrumentation scope.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    /// Returns the spans.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns the scope along with a mutable reference to its spans.
    pub fn split_mut(&mut self) -> (&InstrumentationScope, &mut Vec<Span>) {
        (&self.scope, &mut self.spans)
    }
}

/// Spans emitted by a single resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceSpans {
    resource: Resource,
    scope_spans: Vec<ScopeSpans>,
}

impl ResourceSpans {
    /// Creates a new `ResourceSpans`.
    pub fn new(resource: Resource, scope_spans: Vec<ScopeSpans>) -> Self {
        Self { resource, scope_spans }
    }

    /// Returns the resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the scopes.
    pub fn scope_spans(&self) -> &[ScopeSpans] {
        &self.scope_spans
    }

    /// Returns the resource along with a mutable reference to its scopes.
    pub fn split_mut(&mut self) -> (&Resource, &mut Vec<ScopeSpans>) {
        (&self.resource, &mut self.scope_spans)
    }
}

/// A batch of traces.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracesBatch {
    resource_spans: Vec<ResourceSpans>,
}

impl TracesBatch {
    /// Creates a new `TracesBatch`.
    pub fn new(resource_spans: Vec<ResourceSpans>) -> Self {
        Self { resource_spans }
    }

    /// Returns the resources.
    pub fn resource_spans(&self) -> &[ResourceSpans] {
        &self.resource_spans
    }

    /// Returns a mutable reference to the resources.
    pub fn resource_spans_mut(&mut self) -> &mut Vec<ResourceSpans> {
        &mut self.resource_spans
    }

    /// Returns the total number of spans in the batch.
    pub fn span_count(&self) -> usize {
        self.resource_spans
            .iter()
            .flat_map(|rs| rs.scope_spans.iter())
            .map(|ss| ss.spans.len())
            .sum()
    }
}
