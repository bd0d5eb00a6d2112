use ottl::{EvalContextFamily, ParseError, PathAccessor, PathExpr, Value};
use sieve_data::metrics::Metric;
use sieve_data::{InstrumentationScope, Resource};

use super::{resolve_enum, scalar, CommonPath};

/// A metric with its enclosing resource and scope.
#[derive(Clone, Copy, Debug)]
pub struct MetricContext<'a> {
    /// The metric under evaluation.
    pub metric: &'a Metric,

    /// The enclosing instrumentation scope.
    pub scope: &'a InstrumentationScope,

    /// The enclosing resource.
    pub resource: &'a Resource,
}

/// Context family for metric conditions.
#[derive(Debug)]
pub struct MetricFamily;

/// A resolved metric path.
#[derive(Debug)]
pub enum MetricPath {
    /// A resource or scope path.
    Common(CommonPath),
    /// A field of the metric.
    Field(MetricField),
}

/// Metric fields shared by the metric and data point contexts.
#[derive(Debug)]
pub enum MetricField {
    /// `name`.
    Name,
    /// `description`.
    Description,
    /// `unit`.
    Unit,
    /// `type`, one of the `METRIC_DATA_TYPE_*` values.
    Type,
    /// `aggregation_temporality`.
    AggregationTemporality,
    /// `is_monotonic`.
    IsMonotonic,
}

impl MetricField {
    pub(crate) fn resolve(segments: &[&str], path: &PathExpr) -> Result<Self, ParseError> {
        let field = match segments {
            ["name"] => MetricField::Name,
            ["description"] => MetricField::Description,
            ["unit"] => MetricField::Unit,
            ["type"] => MetricField::Type,
            ["aggregation_temporality"] => MetricField::AggregationTemporality,
            ["is_monotonic"] => MetricField::IsMonotonic,
            _ => return Err(ParseError::unknown_path(path)),
        };
        scalar(path).map(|()| field)
    }

    pub(crate) fn get<'a>(&self, metric: &'a Metric) -> Value<'a> {
        match self {
            MetricField::Name => Value::str(metric.name()),
            MetricField::Description => Value::str(metric.description()),
            MetricField::Unit => Value::str(metric.unit()),
            MetricField::Type => Value::Int(metric.metric_type().as_i64()),
            MetricField::AggregationTemporality => Value::Int(metric.aggregation_temporality().as_i64()),
            MetricField::IsMonotonic => Value::Bool(metric.is_monotonic()),
        }
    }
}

impl EvalContextFamily for MetricFamily {
    type Context<'a> = MetricContext<'a>;
    type Path = MetricPath;

    fn resolve_path(path: &PathExpr) -> Result<MetricPath, ParseError> {
        if let Some(common) = CommonPath::resolve(path) {
            return common.map(MetricPath::Common);
        }
        MetricField::resolve(&path.segments(), path).map(MetricPath::Field)
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        resolve_enum(name)
    }
}

impl PathAccessor<MetricFamily> for MetricPath {
    fn get<'a>(&self, ctx: &<MetricFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        match self {
            MetricPath::Common(common) => common.get(ctx.resource, ctx.scope),
            MetricPath::Field(field) => field.get(ctx.metric),
        }
    }
}
