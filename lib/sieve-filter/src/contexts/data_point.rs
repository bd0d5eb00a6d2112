use ottl::{EvalContextFamily, IndexExpr, ParseError, PathAccessor, PathExpr, Value};
use sieve_data::metrics::{DataPoint, DataPointValue, Metric};
use sieve_data::{InstrumentationScope, Resource};

use super::metric::MetricField;
use super::{attributes_at, resolve_enum, scalar, uint, CommonPath};

/// A data point with its parent metric and the metric's enclosing resource and scope.
#[derive(Clone, Copy, Debug)]
pub struct DataPointContext<'a> {
    /// The data point under evaluation.
    pub data_point: &'a DataPoint,

    /// The metric the data point belongs to.
    pub metric: &'a Metric,

    /// The enclosing instrumentation scope.
    pub scope: &'a InstrumentationScope,

    /// The enclosing resource.
    pub resource: &'a Resource,
}

/// Context family for data point conditions.
#[derive(Debug)]
pub struct DataPointFamily;

/// A resolved data point path.
#[derive(Debug)]
pub enum DataPointPath {
    /// A resource or scope path.
    Common(CommonPath),
    /// A field of the parent metric, under `metric.`.
    Metric(MetricField),
    /// `attributes`, optionally indexed.
    Attributes(Vec<IndexExpr>),
    /// `start_time_unix_nano`.
    StartTimeUnixNano,
    /// `time_unix_nano`.
    TimeUnixNano,
    /// `value_int`, `nil` unless the point holds an integer.
    ValueInt,
    /// `value_double`, `nil` unless the point holds a double.
    ValueDouble,
    /// `count` of histogram and summary points.
    Count,
    /// `sum` of histogram and summary points.
    Sum,
    /// `flags`.
    Flags,
}

impl EvalContextFamily for DataPointFamily {
    type Context<'a> = DataPointContext<'a>;
    type Path = DataPointPath;

    fn resolve_path(path: &PathExpr) -> Result<DataPointPath, ParseError> {
        if let Some(common) = CommonPath::resolve(path) {
            return common.map(DataPointPath::Common);
        }

        let resolved = match path.segments().as_slice() {
            ["metric", rest @ ..] => return MetricField::resolve(rest, path).map(DataPointPath::Metric),
            ["attributes"] => return Ok(DataPointPath::Attributes(path.indexes.clone())),
            ["start_time_unix_nano"] => DataPointPath::StartTimeUnixNano,
            ["time_unix_nano"] => DataPointPath::TimeUnixNano,
            ["value_int"] => DataPointPath::ValueInt,
            ["value_double"] => DataPointPath::ValueDouble,
            ["count"] => DataPointPath::Count,
            ["sum"] => DataPointPath::Sum,
            ["flags"] => DataPointPath::Flags,
            _ => return Err(ParseError::unknown_path(path)),
        };
        scalar(path).map(|()| resolved)
    }

    fn resolve_enum(name: &str) -> Option<i64> {
        resolve_enum(name)
    }
}

impl PathAccessor<DataPointFamily> for DataPointPath {
    fn get<'a>(&self, ctx: &<DataPointFamily as EvalContextFamily>::Context<'a>) -> Value<'a> {
        let data_point = ctx.data_point;
        match self {
            DataPointPath::Common(common) => common.get(ctx.resource, ctx.scope),
            DataPointPath::Metric(field) => field.get(ctx.metric),
            DataPointPath::Attributes(indexes) => attributes_at(data_point.attributes(), indexes),
            DataPointPath::StartTimeUnixNano => uint(data_point.start_time_unix_nano()),
            DataPointPath::TimeUnixNano => uint(data_point.time_unix_nano()),
            DataPointPath::ValueInt => match data_point.value() {
                DataPointValue::Int(value) => Value::Int(*value),
                _ => Value::Nil,
            },
            DataPointPath::ValueDouble => match data_point.value() {
                DataPointValue::Double(value) => Value::Float(*value),
                _ => Value::Nil,
            },
            DataPointPath::Count => data_point.value().count().map_or(Value::Nil, uint),
            DataPointPath::Sum => data_point.value().sum().map_or(Value::Nil, Value::Float),
            DataPointPath::Flags => Value::Int(i64::from(data_point.flags())),
        }
    }
}
