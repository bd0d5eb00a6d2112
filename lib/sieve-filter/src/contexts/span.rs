use ottl::{EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};
use sieve_data::traces::Span;
use sieve_data::{InstrumentationScope, Resource};

use super::{attributes_at, resolve_enum, scalar, uint, CommonPath};

/// A span with its enclosing resource and scope.
#[derive(Clone, Copy, Debug)]
pub struct SpanContext<'a> {
    /// The span under evaluation.
    pub span: &'a Span,

    /// The enclosing instrumentation scope.
    pub scope: &'a InstrumentationScope,

    /// The enclosing resource.
    pub resource: &'a Resource,
}

/// Context family for span conditions.
#[derive(Debug)]
pub struct SpanFamily;

/// A resolved span path.
#[derive(Debug)]
pub enum SpanPath {
    /// A resource or scope path.
    Common(CommonPath),
    /// A field of the span.
    Field(SpanField),
}

/// Span fields shared by the span and span event contexts.
#[derive(Debug)]
pub enum SpanField {
    /// `name`.
    Name,
    /// `kind`, one of the `SPAN_KIND_*` values.
    Kind,
    /// `status.code`.
    StatusCode,
    /// `status.message`.
    StatusMessage,
    /// `attributes`, optionally indexed.
    Attributes(Vec<IndexExpr>),
    /// `trace_id`.
    TraceId,
    /// `span_id`.
    SpanId,
    /// `parent_span_id`.
    ParentSpanId,
    /// `trace_state`.
    TraceState,
    /// `start_time_unix_nano`.
    StartTimeUnixNano,
    /// `end_time_unix_nano`.
    EndTimeUnixNano,
    /// `dropped_attributes_count`.
    DroppedAttributesCount,
}

impl SpanField {
    /// Resolves span-relative segments, such as `["status", "code"]`.
    pub(crate) fn resolve(segments: &[&str], path: &PathExpr) -> Result<Self, ParseError> {
        let field = match segments {
            ["attributes"] => return Ok(SpanField::Attributes(path.indexes.clone())),
            ["name"] => SpanField::Name,
            ["kind"] => SpanField::Kind,
            ["status", "code"] => SpanField::StatusCode,
            ["status", "message"] => SpanField::StatusMessage,
            ["trace_id"] => SpanField::TraceId,
            ["span_id"] => SpanField::SpanId,
            ["parent_span_id"] => SpanField::ParentSpanId,
            ["trace_state"] => SpanField::TraceState,
            ["start_time_unix_nano"] => SpanField::StartTimeUnixNano,
            ["end_time_unix_nano"] => SpanField::EndTimeUnixNano,
            ["dropped_attributes_count"] => SpanField::DroppedAttributesCount,
            _ => return Err(ParseError::unknown_path(path)),
        };
        scalar(path).map(|()| field)
    }

    pub(crate) fn get<'a>(&self, span: &'a Span) -> Value<'a> {
        match self {
            SpanField::Name => Value::str(span.name()),
            SpanField::Kind => Value::Int(span.kind().as_i64()),
            SpanField::StatusCode => Value::Int(span.status().code().as_i64()),
            SpanField::StatusMessage => Value::str(span.status().message()),
            SpanField::Attributes(indexes) => attributes_at(span.attributes(), indexes),
            SpanField::TraceId => Value::bytes(span.trace_id().as_bytes()),
            SpanField::SpanId => Value::bytes(span.span_id().as_bytes()),
            SpanField::ParentSpanId => Value::bytes(span.parent_span_id().as_bytes()),
            SpanField::TraceState => Value::str(span.trace_state()),
            SpanField::StartTimeUnixNano => uint(span.start_time_unix_nano()),
            SpanField::EndTimeUnixNano => uint(span.end_time_unix_nano()),
            SpanField::DroppedAttributesCount => Value::Int(i64::from(span.dropped_attributes_count())),
        }
    }
}

impl EvalContextFamily for SpanFamily {
    type Context<'a> = SpanContext<'a>;
    type Path = SpanPath;

    fn resolve_path(path: &PathExpr) -> Result<SpanPath, ParseError> {
        if let Some(common) = CommonPath::resolve(path) {
            return common.map(SpanPath::Common);
        }
        SpanField::resolve(&path.segments(), path).map(SpanPath::Field)
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        resolve_enum(name)
    }
}

impl PathAccessor<SpanFamily> for SpanPath {
    fn get<'a>(&self, ctx: &<SpanFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        match self {
            SpanPath::Common(common) => common.get(ctx.resource, ctx.scope),
            SpanPath::Field(field) => field.get(ctx.span),
        }
    }
}

#[cfg(test)]
mod tests {
    use ottl::Condition;
    use sieve_data::traces::{SpanKind, Status, StatusCode};
    use sieve_data::{Attributes, SpanId, TraceId};

    use super::*;

    fn span() -> Span {
        Span::new("GET /checkout")
            .with_kind(SpanKind::Server)
            .with_ids(
                TraceId::from_bytes([0xab; 16]),
                SpanId::from_bytes([0xcd; 8]),
                SpanId::default(),
            )
            .with_trace_state("vendor=1")
            .with_timestamps(100, 250)
            .with_status(Status::new(StatusCode::Error, "boom"))
            .with_attributes(Attributes::from_iter([("http.status_code", 503_i64)]))
    }

    fn eval(condition: &str) -> bool {
        let span = span();
        let scope = InstrumentationScope::new("tracer");
        let resource = Resource::new(Attributes::from_iter([("service.name", "shop")]));
        Condition::<SpanFamily>::parse(condition).unwrap().evaluate(&SpanContext {
            span: &span,
            scope: &scope,
            resource: &resource,
        })
    }

    #[test]
    fn span_fields() {
        assert!(eval(r#"name == "GET /checkout""#));
        assert!(eval("kind == SPAN_KIND_SERVER"));
        assert!(eval("status.code == STATUS_CODE_ERROR"));
        assert!(eval(r#"status.message == "boom""#));
        assert!(eval(r#"attributes["http.status_code"] >= 500"#));
        assert!(eval("trace_id == TraceID(0xabababababababababababababababab)"));
        assert!(eval("span_id == SpanID(0xcdcdcdcdcdcdcdcd)"));
        assert!(eval("parent_span_id == SpanID(0x0000000000000000)"));
        assert!(eval(r#"trace_state == "vendor=1""#));
        assert!(eval("start_time_unix_nano < end_time_unix_nano"));
        assert!(eval("dropped_attributes_count == 0"));
    }

    #[test]
    fn enclosing_fields() {
        assert!(eval(r#"resource.attributes["service.name"] == "shop""#));
        assert!(eval(r#"instrumentation_scope.name == "tracer""#));
    }

    #[test]
    fn unknown_paths() {
        assert!(Condition::<SpanFamily>::parse("severity_number > 1").is_err());
        assert!(Condition::<SpanFamily>::parse("status == 1").is_err());
        assert!(Condition::<SpanFamily>::parse(r#"name["x"] == "y""#).is_err());
    }
}
