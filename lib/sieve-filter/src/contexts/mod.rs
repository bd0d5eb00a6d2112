//! Evaluation contexts.
//!
//! Each signal kind has a context family binding one item, together with its enclosing resource and instrumentation
//! scope, for the duration of one condition evaluation. Contexts only hold references, so creating one per item costs
//! nothing.
//!
//! Every family shares the `resource.*` and `instrumentation_scope.*` paths and the same set of enum names.

use std::borrow::Cow;

use ottl::{IndexExpr, ParseError, PathExpr, Value};
use sieve_data::{AttributeValue, Attributes, InstrumentationScope, Resource};

mod data_point;
pub use self::data_point::{DataPointContext, DataPointFamily};

mod log;
pub use self::log::{LogRecordContext, LogRecordFamily};

mod metric;
pub use self::metric::{MetricContext, MetricFamily};

mod span;
pub use self::span::{SpanContext, SpanFamily};

mod span_event;
pub use self::span_event::{SpanEventContext, SpanEventFamily};

static ENUMS: &[(&str, i64)] = &[
    ("SEVERITY_NUMBER_UNSPECIFIED", 0),
    ("SEVERITY_NUMBER_TRACE", 1),
    ("SEVERITY_NUMBER_TRACE2", 2),
    ("SEVERITY_NUMBER_TRACE3", 3),
    ("SEVERITY_NUMBER_TRACE4", 4),
    ("SEVERITY_NUMBER_DEBUG", 5),
    ("SEVERITY_NUMBER_DEBUG2", 6),
    ("SEVERITY_NUMBER_DEBUG3", 7),
    ("SEVERITY_NUMBER_DEBUG4", 8),
    ("SEVERITY_NUMBER_INFO", 9),
    ("SEVERITY_NUMBER_INFO2", 10),
    ("SEVERITY_NUMBER_INFO3", 11),
    ("SEVERITY_NUMBER_INFO4", 12),
    ("SEVERITY_NUMBER_WARN", 13),
    ("SEVERITY_NUMBER_WARN2", 14),
    ("SEVERITY_NUMBER_WARN3", 15),
    ("SEVERITY_NUMBER_WARN4", 16),
    ("SEVERITY_NUMBER_ERROR", 17),
    ("SEVERITY_NUMBER_ERROR2", 18),
    ("SEVERITY_NUMBER_ERROR3", 19),
    ("SEVERITY_NUMBER_ERROR4", 20),
    ("SEVERITY_NUMBER_FATAL", 21),
    ("SEVERITY_NUMBER_FATAL2", 22),
    ("SEVERITY_NUMBER_FATAL3", 23),
    ("SEVERITY_NUMBER_FATAL4", 24),
    ("SPAN_KIND_UNSPECIFIED", 0),
    ("SPAN_KIND_INTERNAL", 1),
    ("SPAN_KIND_SERVER", 2),
    ("SPAN_KIND_CLIENT", 3),
    ("SPAN_KIND_PRODUCER", 4),
    ("SPAN_KIND_CONSUMER", 5),
    ("STATUS_CODE_UNSET", 0),
    ("STATUS_CODE_OK", 1),
    ("STATUS_CODE_ERROR", 2),
    ("METRIC_DATA_TYPE_NONE", 0),
    ("METRIC_DATA_TYPE_GAUGE", 1),
    ("METRIC_DATA_TYPE_SUM", 2),
    ("METRIC_DATA_TYPE_HISTOGRAM", 3),
    ("METRIC_DATA_TYPE_EXPONENTIAL_HISTOGRAM", 4),
    ("METRIC_DATA_TYPE_SUMMARY", 5),
    ("AGGREGATION_TEMPORALITY_UNSPECIFIED", 0),
    ("AGGREGATION_TEMPORALITY_DELTA", 1),
    ("AGGREGATION_TEMPORALITY_CUMULATIVE", 2),
];

/// Resolves an enum name shared by every context family.
pub(crate) fn resolve_enum(name: &str) -> Option<i64> {
    ENUMS.iter().find(|(n, _)| *n == name).map(|(_, value)| *value)
}

/// Paths available in every context: the enclosing resource and instrumentation scope.
#[derive(Debug)]
pub enum CommonPath {
    /// `resource.attributes`, optionally indexed.
    ResourceAttributes(Vec<IndexExpr>),
    /// `resource.dropped_attributes_count`.
    ResourceDroppedAttributesCount,
    /// `instrumentation_scope.name`.
    ScopeName,
    /// `instrumentation_scope.version`.
    ScopeVersion,
    /// `instrumentation_scope.attributes`, optionally indexed.
    ScopeAttributes(Vec<IndexExpr>),
}

impl CommonPath {
    /// Resolves a shared path, returning `None` if the path does not start with `resource` or
    /// `instrumentation_scope`.
    pub(crate) fn resolve(path: &PathExpr) -> Option<Result<Self, ParseError>> {
        let segments = path.segments();
        let resolved = match segments.as_slice() {
            ["resource", "attributes"] => Ok(CommonPath::ResourceAttributes(path.indexes.clone())),
            ["resource", "dropped_attributes_count"] => {
                scalar(path).map(|()| CommonPath::ResourceDroppedAttributesCount)
            }
            ["instrumentation_scope", "name"] => scalar(path).map(|()| CommonPath::ScopeName),
            ["instrumentation_scope", "version"] => scalar(path).map(|()| CommonPath::ScopeVersion),
            ["instrumentation_scope", "attributes"] => Ok(CommonPath::ScopeAttributes(path.indexes.clone())),
            ["resource", ..] | ["instrumentation_scope", ..] => Err(ParseError::unknown_path(path)),
            _ => return None,
        };
        Some(resolved)
    }

    pub(crate) fn get<'a>(&self, resource: &'a Resource, scope: &'a InstrumentationScope) -> Value<'a> {
        match self {
            CommonPath::ResourceAttributes(indexes) => attributes_at(resource.attributes(), indexes),
            CommonPath::ResourceDroppedAttributesCount => Value::Int(i64::from(resource.dropped_attributes_count())),
            CommonPath::ScopeName => Value::str(scope.name()),
            CommonPath::ScopeVersion => Value::str(scope.version()),
            CommonPath::ScopeAttributes(indexes) => attributes_at(scope.attributes(), indexes),
        }
    }
}

/// Checks that a scalar path is not indexed.
pub(crate) fn scalar(path: &PathExpr) -> Result<(), ParseError> {
    if path.indexes.is_empty() {
        Ok(())
    } else {
        Err(ParseError::invalid_path(path, "field cannot be indexed"))
    }
}

/// Converts an unsigned integer field, saturating at `i64::MAX`.
pub(crate) fn uint(value: u64) -> Value<'static> {
    Value::Int(i64::try_from(value).unwrap_or(i64::MAX))
}

/// Reads an attribute set through a sequence of indexes.
///
/// With no indexes, the whole set is returned as a map. The first index selects an attribute by key, and any further
/// indexes walk into nested lists and maps. Anything that cannot be found is nil.
pub(crate) fn attributes_at<'a>(attributes: &'a Attributes, indexes: &[IndexExpr]) -> Value<'a> {
    match indexes.split_first() {
        None => attributes_value(attributes),
        Some((IndexExpr::String(key), rest)) => attributes.get(key).map_or(Value::Nil, |value| value_at(value, rest)),
        Some((IndexExpr::Int(_), _)) => Value::Nil,
    }
}

/// Reads an attribute value through a sequence of indexes.
pub(crate) fn value_at<'a>(value: &'a AttributeValue, indexes: &[IndexExpr]) -> Value<'a> {
    let mut current = value;
    for index in indexes {
        let next = match (current, index) {
            (AttributeValue::Array(items), IndexExpr::Int(i)) => items.get(*i),
            (AttributeValue::Map(attributes), IndexExpr::String(key)) => attributes.get(key),
            _ => None,
        };
        match next {
            Some(next) => current = next,
            None => return Value::Nil,
        }
    }
    attribute_value(current)
}

/// Converts an attribute value, borrowing strings.
pub(crate) fn attribute_value(value: &AttributeValue) -> Value<'_> {
    match value {
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Int(i) => Value::Int(*i),
        AttributeValue::Double(d) => Value::Float(*d),
        AttributeValue::String(s) => Value::str(s),
        AttributeValue::Array(items) => Value::List(items.iter().map(attribute_value).collect()),
        AttributeValue::Map(attributes) => attributes_value(attributes),
    }
}

fn attributes_value(attributes: &Attributes) -> Value<'_> {
    Value::Map(
        attributes
            .iter()
            .map(|(key, value)| (Cow::Borrowed(key), attribute_value(value)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested() -> Attributes {
        let inner = Attributes::from_iter([("code", AttributeValue::from(503_i64))]);
        Attributes::from_iter([
            ("plain", AttributeValue::from("x")),
            (
                "list",
                AttributeValue::Array(vec![AttributeValue::from("a"), AttributeValue::Map(inner.clone())]),
            ),
            ("map", AttributeValue::Map(inner)),
        ])
    }

    #[test]
    fn nested_indexing() {
        let attrs = nested();
        let key = |k: &str| IndexExpr::String(k.to_string());

        assert_eq!(attributes_at(&attrs, &[key("plain")]), Value::str("x"));
        assert_eq!(attributes_at(&attrs, &[key("map"), key("code")]), Value::Int(503));
        assert_eq!(
            attributes_at(&attrs, &[key("list"), IndexExpr::Int(1), key("code")]),
            Value::Int(503)
        );
        assert_eq!(attributes_at(&attrs, &[key("list"), IndexExpr::Int(0)]), Value::str("a"));
    }

    #[test]
    fn misses_are_nil() {
        let attrs = nested();
        let key = |k: &str| IndexExpr::String(k.to_string());

        assert_eq!(attributes_at(&attrs, &[key("missing")]), Value::Nil);
        assert_eq!(attributes_at(&attrs, &[IndexExpr::Int(0)]), Value::Nil);
        assert_eq!(attributes_at(&attrs, &[key("list"), IndexExpr::Int(7)]), Value::Nil);
        assert_eq!(attributes_at(&attrs, &[key("plain"), key("deeper")]), Value::Nil);
        assert_eq!(attributes_at(&attrs, &[key("map"), IndexExpr::Int(0)]), Value::Nil);
    }

    #[test]
    fn whole_set_is_a_map() {
        match attributes_at(&nested(), &[]) {
            Value::Map(map) => {
                assert_eq!(map.len(), 3);
                assert_eq!(map.get("plain"), Some(&Value::str("x")));
            }
            other => panic!("expected a map, got {:?}", other),
        }
    }

    #[test]
    fn enums() {
        assert_eq!(resolve_enum("SEVERITY_NUMBER_WARN"), Some(13));
        assert_eq!(resolve_enum("SPAN_KIND_CONSUMER"), Some(5));
        assert_eq!(resolve_enum("STATUS_CODE_ERROR"), Some(2));
        assert_eq!(resolve_enum("METRIC_DATA_TYPE_SUMMARY"), Some(5));
        assert_eq!(resolve_enum("AGGREGATION_TEMPORALITY_CUMULATIVE"), Some(2));
        assert_eq!(resolve_enum("SPAN_KIND_SERVERLESS"), None);
    }
}
