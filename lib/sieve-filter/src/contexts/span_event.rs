use ottl::{EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};
use sieve_data::traces::{Span, SpanEvent};
use sieve_data::{InstrumentationScope, Resource};

use super::span::SpanField;
use super::{attributes_at, resolve_enum, scalar, uint, CommonPath};

/// A span event with its parent span and the span's enclosing resource and scope.
#[derive(Clone, Copy, Debug)]
pub struct SpanEventContext<'a> {
    /// The span event under evaluation.
    pub event: &'a SpanEvent,

    /// The span the event belongs to.
    pub span: &'a Span,

    /// The enclosing instrumentation scope.
    pub scope: &'a InstrumentationScope,

    /// The enclosing resource.
    pub resource: &'a Resource,
}

/// Context family for span event conditions.
#[derive(Debug)]
pub struct SpanEventFamily;

/// A resolved span event path.
#[derive(Debug)]
pub enum SpanEventPath {
    /// A resource or scope path.
    Common(CommonPath),
    /// A field of the parent span, under `span.`.
    Span(SpanField),
    /// `name`.
    Name,
    /// `attributes`, optionally indexed.
    Attributes(Vec<IndexExpr>),
    /// `time_unix_nano`.
    TimeUnixNano,
    /// `dropped_attributes_count`.
    DroppedAttributesCount,
}

impl EvalContextFamily for SpanEventFamily {
    type Context<'a> = SpanEventContext<'a>;
    type Path = SpanEventPath;

    fn resolve_path(path: &PathExpr) -> Result<SpanEventPath, ParseError> {
        if let Some(common) = CommonPath::resolve(path) {
            return common.map(SpanEventPath::Common);
        }

        let resolved = match path.segments().as_slice() {
            ["span", rest @ ..] => return SpanField::resolve(rest, path).map(SpanEventPath::Span),
            ["attributes"] => return Ok(SpanEventPath::Attributes(path.indexes.clone())),
            ["name"] => SpanEventPath::Name,
            ["time_unix_nano"] => SpanEventPath::TimeUnixNano,
            ["dropped_attributes_count"] => SpanEventPath::DroppedAttributesCount,
            _ => return Err(ParseError::unknown_path(path)),
        };
        scalar(path).map(|()| resolved)
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        resolve_enum(name)
    }
}

impl PathAccessor<SpanEventFamily> for SpanEventPath {
    fn get<'a>(&self, ctx: &<SpanEventFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        match self {
            SpanEventPath::Common(common) => common.get(ctx.resource, ctx.scope),
            SpanEventPath::Span(field) => field.get(ctx.span),
            SpanEventPath::Name => Value::str(ctx.event.name()),
            SpanEventPath::Attributes(indexes) => attributes_at(ctx.event.attributes(), indexes),
            SpanEventPath::TimeUnixNano => uint(ctx.event.time_unix_nano()),
            SpanEventPath::DroppedAttributesCount => Value::Int(i64::from(ctx.event.dropped_attributes_count())),
        }
    }
}

#[cfg(test)]
mod tests {
    use ottl::Condition;
    use sieve_data::traces::SpanKind;
    use sieve_data::Attributes;

    use super::*;

    fn eval(condition: &str) -> bool {
        let event = SpanEvent::new("exception")
            .with_time_unix_nano(42)
            .with_attributes(Attributes::from_iter([("exception.type", "IOError")]));
        let span = Span::new("upload")
            .with_kind(SpanKind::Client)
            .with_attributes(Attributes::from_iter([("retry", true)]));
        let scope = InstrumentationScope::default();
        let resource = Resource::default();

        Condition::<SpanEventFamily>::parse(condition)
            .unwrap()
            .evaluate(&SpanEventContext {
                event: &event,
                span: &span,
                scope: &scope,
                resource: &resource,
            })
    }

    #[test]
    fn event_fields() {
        assert!(eval(r#"name == "exception""#));
        assert!(eval(r#"attributes["exception.type"] == "IOError""#));
        assert!(eval("time_unix_nano == 42"));
        assert!(eval("dropped_attributes_count == 0"));
    }

    #[test]
    fn parent_span_fields() {
        assert!(eval(r#"span.name == "upload""#));
        assert!(eval("span.kind == SPAN_KIND_CLIENT"));
        assert!(eval(r#"span.attributes["retry"]"#));
        assert!(eval("span.status.code == STATUS_CODE_UNSET"));
    }

    #[test]
    fn unknown_paths() {
        assert!(Condition::<SpanEventFamily>::parse("kind == 1").is_err());
        assert!(Condition::<SpanEventFamily>::parse("span.events == nil").is_err());
        assert!(Condition::<SpanEventFamily>::parse(r#"span == "x""#).is_err());
    }
}
