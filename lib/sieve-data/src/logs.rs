//! Logs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AttributeValue, Attributes, InstrumentationScope, Resource, SpanId, TraceId};

/// Log severity number.
///
/// Ranges from 1 (`TRACE`) to 24 (`FATAL4`), in four steps per severity level. Zero means the severity is unspecified.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SeverityNumber(u8);

macro_rules! severity_constants {
    ($($name:ident = $value:literal),+ $(,)?) => {
        impl SeverityNumber {
            $(
                #[doc = concat!("Severity `", stringify!($name), "`.")]
                pub const $name: SeverityNumber = SeverityNumber($value);
            )+
        }
    };
}

severity_constants! {
    UNSPECIFIED = 0,
    TRACE = 1, TRACE2 = 2, TRACE3 = 3, TRACE4 = 4,
    DEBUG = 5, DEBUG2 = 6, DEBUG3 = 7, DEBUG4 = 8,
    INFO = 9, INFO2 = 10, INFO3 = 11, INFO4 = 12,
    WARN = 13, WARN2 = 14, WARN3 = 15, WARN4 = 16,
    ERROR = 17, ERROR2 = 18, ERROR3 = 19, ERROR4 = 20,
    FATAL = 21, FATAL2 = 22, FATAL3 = 23, FATAL4 = 24,
}

impl SeverityNumber {
    /// Creates a severity number from its raw value, returning `None` if it is out of range.
    pub const fn new(value: u8) -> Option<Self> {
        if value <= 24 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the raw value.
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` if the severity is unspecified.
    pub const fn is_unspecified(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for SeverityNumber {
    type Error = InvalidSeverityNumber;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidSeverityNumber(value))
    }
}

impl From<SeverityNumber> for u8 {
    fn from(severity: SeverityNumber) -> u8 {
        severity.0
    }
}

/// A raw severity number above `FATAL4`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InvalidSeverityNumber(pub u8);

impl fmt::Display for InvalidSeverityNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "severity number {} is out of range (0-24)", self.0)
    }
}

impl std::error::Error for InvalidSeverityNumber {}

/// A log record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogRecord {
    time_unix_nano: u64,
    observed_time_unix_nano: u64,
    severity_number: SeverityNumber,
    severity_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<AttributeValue>,
    attributes: Attributes,
    dropped_attributes_count: u32,
    flags: u32,
    trace_id: TraceId,
    span_id: SpanId,
}

impl LogRecord {
    /// Creates a new `LogRecord` with the given body.
    pub fn new(body: impl Into<AttributeValue>) -> Self {
        Self {
            body: Some(body.into()),
            ..Default::default()
        }
    }

    /// Sets the record timestamp.
    pub fn with_time_unix_nano(mut self, time_unix_nano: u64) -> Self {
        self.time_unix_nano = time_unix_nano;
        self
    }

    /// Sets the time at which the record was observed by the collection system.
    pub fn with_observed_time_unix_nano(mut self, observed_time_unix_nano: u64) -> Self {
        self.observed_time_unix_nano = observed_time_unix_nano;
        self
    }

    /// Sets the severity number.
    pub fn with_severity_number(mut self, severity_number: SeverityNumber) -> Self {
        self.severity_number = severity_number;
        self
    }

    /// Sets the severity text.
    pub fn with_severity_text(mut self, severity_text: impl Into<String>) -> Self {
        self.severity_text = severity_text.into();
        self
    }

    /// Sets the body.
    pub fn with_body(mut self, body: impl Into<Option<AttributeValue>>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the record flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Sets the trace and span identifiers of the span that was active when the record was emitted.
    pub fn with_trace_context(mut self, trace_id: TraceId, span_id: SpanId) -> Self {
        self.trace_id = trace_id;
        self.span_id = span_id;
        self
    }

    /// Returns the record timestamp.
    pub fn time_unix_nano(&self) -> u64 {
        self.time_unix_nano
    }

    /// Returns the observed timestamp.
    pub fn observed_time_unix_nano(&self) -> u64 {
        self.observed_time_unix_nano
    }

    /// Returns the severity number.
    pub fn severity_number(&self) -> SeverityNumber {
        self.severity_number
    }

    /// Returns the severity text.
    pub fn severity_text(&self) -> &str {
        &self.severity_text
    }

    /// Returns the body, if set.
    pub fn body(&self) -> Option<&AttributeValue> {
        self.body.as_ref()
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the number of attributes that were discarded upstream.
    pub fn dropped_attributes_count(&self) -> u32 {
        self.dropped_attributes_count
    }

    /// Returns the record flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// Returns the trace identifier.
    pub fn trace_id(&self) -> &TraceId {
        &self.trace_id
    }

    /// Returns the span identifier.
    pub fn span_id(&self) -> &SpanId {
        &self.span_id
    }
}

/// Log records emitted by a single instrumentation scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeLogs {
    scope: InstrumentationScope,
    log_records: Vec<LogRecord>,
}

impl ScopeLogs {
    /// Creates a new `ScopeLogs`.
    pub fn new(scope: InstrumentationScope, log_records: Vec<LogRecord>) -> Self {
        Self { scope, log_records }
    }

    /// Returns the instrumentation scope.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    /// Returns the log records.
    pub fn log_records(&self) -> &[LogRecord] {
        &self.log_records
    }

    /// Returns a mutable reference to the log records.
    pub fn log_records_mut(&mut self) -> &mut Vec<LogRecord> {
        &mut self.log_records
    }

    /// Returns the scope along with a mutable reference to its log records.
    pub fn split_mut(&mut self) -> (&InstrumentationScope, &mut Vec<LogRecord>) {
        (&self.scope, &mut self.log_records)
    }
}

/// Log records emitted by a single resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLogs {
    resource: Resource,
    scope_logs: Vec<ScopeLogs>,
}

impl ResourceLogs {
    /// Creates a new `ResourceLogs`.
    pub fn new(resource: Resource, scope_logs: Vec<ScopeLogs>) -> Self {
        Self { resource, scope_logs }
    }

    /// Returns the resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the scopes.
    pub fn scope_logs(&self) -> &[ScopeLogs] {
        &self.scope_logs
    }

    /// Returns the resource along with a mutable reference to its scopes.
    ///
    /// The resource is borrowed immutably so that it can be consulted while the scopes are being modified.
    pub fn split_mut(&mut self) -> (&Resource, &mut Vec<ScopeLogs>) {
        (&self.resource, &mut self.scope_logs)
    }
}

/// A batch of logs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogsBatch {
    resource_logs: Vec<ResourceLogs>,
}

impl LogsBatch {
    /// Creates a new `LogsBatch`.
    pub fn new(resource_logs: Vec<ResourceLogs>) -> Self {
        Self { resource_logs }
    }

    /// Returns the resources.
    pub fn resource_logs(&self) -> &[ResourceLogs] {
        &self.resource_logs
    }

    /// Returns a mutable reference to the resources.
    pub fn resource_logs_mut(&mut self) -> &mut Vec<ResourceLogs> {
        &mut self.resource_logs
    }

    /// Returns the total number of log records in the batch.
    pub fn log_record_count(&self) -> usize {
        self.resource_logs
            .iter()
            .flat_map(|rl| rl.scope_logs.iter())
            .map(|sl| sl.log_records.len())
            .sum()
    }
}
