use ottl::{EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};
use sieve_data::logs::LogRecord;
use sieve_data::{InstrumentationScope, Resource};

use super::{attributes_at, resolve_enum, scalar, uint, value_at, CommonPath};

/// A log record with its enclosing resource and scope.
#[derive(Clone, Copy, Debug)]
pub struct LogRecordContext<'a> {
    /// The log record under evaluation.
    pub record: &'a LogRecord,

    /// The enclosing instrumentation scope.
    pub scope: &'a InstrumentationScope,

    /// The enclosing resource.
    pub resource: &'a Resource,
}

/// Context family for log record conditions.
#[derive(Debug)]
pub struct LogRecordFamily;

/// A resolved log record path.
#[derive(Debug)]
pub enum LogRecordPath {
    /// A resource or scope path.
    Common(CommonPath),
    /// `attributes`, optionally indexed.
    Attributes(Vec<IndexExpr>),
    /// `body`, indexed into map and list bodies.
    Body(Vec<IndexExpr>),
    /// `severity_number`.
    SeverityNumber,
    /// `severity_text`.
    SeverityText,
    /// `time_unix_nano`.
    TimeUnixNano,
    /// `observed_time_unix_nano`.
    ObservedTimeUnixNano,
    /// `trace_id`.
    TraceId,
    /// `span_id`.
    SpanId,
    /// `flags`.
    Flags,
    /// `dropped_attributes_count`.
    DroppedAttributesCount,
}

impl EvalContextFamily for LogRecordFamily {
    type Context<'a> = LogRecordContext<'a>;
    type Path = LogRecordPath;

    fn resolve_path(path: &PathExpr) -> Result<LogRecordPath, ParseError> {
        if let Some(common) = CommonPath::resolve(path) {
            return common.map(LogRecordPath::Common);
        }

        let resolved = match path.segments().as_slice() {
            ["attributes"] => return Ok(LogRecordPath::Attributes(path.indexes.clone())),
            ["body"] => return Ok(LogRecordPath::Body(path.indexes.clone())),
            ["severity_number"] => LogRecordPath::SeverityNumber,
            ["severity_text"] => LogRecordPath::SeverityText,
            ["time_unix_nano"] => LogRecordPath::TimeUnixNano,
            ["observed_time_unix_nano"] => LogRecordPath::ObservedTimeUnixNano,
            ["trace_id"] => LogRecordPath::TraceId,
            ["span_id"] => LogRecordPath::SpanId,
            ["flags"] => LogRecordPath::Flags,
            ["dropped_attributes_count"] => LogRecordPath::DroppedAttributesCount,
            _ => return Err(ParseError::unknown_path(path)),
        };
        scalar(path).map(|()| resolved)
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        resolve_enum(name)
    }
}

impl PathAccessor<LogRecordFamily> for LogRecordPath {
    fn get<'a>(&self, ctx: &<LogRecordFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        let record = ctx.record;
        match self {
            LogRecordPath::Common(common) => common.get(ctx.resource, ctx.scope),
            LogRecordPath::Attributes(indexes) => attributes_at(record.attributes(), indexes),
            LogRecordPath::Body(indexes) => record.body().map_or(Value::Nil, |body| value_at(body, indexes)),
            LogRecordPath::SeverityNumber => Value::Int(i64::from(record.severity_number().value())),
            LogRecordPath::SeverityText => Value::str(record.severity_text()),
            LogRecordPath::TimeUnixNano => uint(record.time_unix_nano()),
            LogRecordPath::ObservedTimeUnixNano => uint(record.observed_time_unix_nano()),
            LogRecordPath::TraceId => Value::bytes(record.trace_id().as_bytes()),
            LogRecordPath::SpanId => Value::bytes(record.span_id().as_bytes()),
            LogRecordPath::Flags => Value::Int(i64::from(record.flags())),
            LogRecordPath::DroppedAttributesCount => Value::Int(i64::from(record.dropped_attributes_count())),
        }
    }
}
