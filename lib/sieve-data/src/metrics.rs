//! Metrics.

use serde::{Deserialize, Serialize};

use crate::{Attributes, InstrumentationScope, Resource};

/// Metric data type.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    /// No data type has been set.
    #[default]
    Empty,
    /// Instantaneous measurement.
    Gauge,
    /// Running total or delta.
    Sum,
    /// Distribution with explicit bucket boundaries.
    Histogram,
    /// Distribution with exponentially-scaled buckets.
    ExponentialHistogram,
    /// Precomputed quantiles.
    Summary,
}

impl MetricType {
    /// Returns the numeric value of this type.
    pub const fn as_i64(&self) -> i64 {
        match self {
            MetricType::Empty => 0,
            MetricType::Gauge => 1,
            MetricType::Sum => 2,
            MetricType::Histogram => 3,
            MetricType::ExponentialHistogram => 4,
            MetricType::Summary => 5,
        }
    }
}

/// Aggregation temporality of a cumulative-capable metric.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationTemporality {
    /// Temporality was not set.
    #[default]
    Unspecified,
    /// Each point covers the interval since the previous report.
    Delta,
    /// Each point covers the interval since a fixed start time.
    Cumulative,
}

impl AggregationTemporality {
    /// Returns the numeric value of this temporality.
    pub const fn as_i64(&self) -> i64 {
        match self {
            AggregationTemporality::Unspecified => 0,
            AggregationTemporality::Delta => 1,
            AggregationTemporality::Cumulative => 2,
        }
    }
}

/// A single quantile of a summary data point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuantileValue {
    /// Quantile, between 0.0 and 1.0.
    pub quantile: f64,
    /// Value at the quantile.
    pub value: f64,
}

/// Value carried by a data point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataPointValue {
    /// Integer gauge or sum value.
    Int(i64),
    /// Floating-point gauge or sum value.
    Double(f64),
    /// Explicit-bucket histogram.
    Histogram {
        /// Number of observations.
        count: u64,
        /// Sum of observations, if known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sum: Option<f64>,
        /// Count per bucket.
        #[serde(default)]
        bucket_counts: Vec<u64>,
        /// Upper bounds of every bucket but the last.
        #[serde(default)]
        explicit_bounds: Vec<f64>,
    },
    /// Exponential histogram.
    ExponentialHistogram {
        /// Number of observations.
        count: u64,
        /// Sum of observations, if known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sum: Option<f64>,
        /// Bucket resolution.
        #[serde(default)]
        scale: i32,
        /// Number of observations equal to zero.
        #[serde(default)]
        zero_count: u64,
    },
    /// Summary.
    Summary {
        /// Number of observations.
        count: u64,
        /// Sum of observations.
        sum: f64,
        /// Quantiles.
        #[serde(default)]
        quantile_values: Vec<QuantileValue>,
    },
}

impl Default for DataPointValue {
    fn default() -> Self {
        DataPointValue::Int(0)
    }
}

impl DataPointValue {
    /// Returns the observation count of a distribution value.
    pub fn count(&self) -> Option<u64> {
        match self {
            DataPointValue::Int(_) | DataPointValue::Double(_) => None,
            DataPointValue::Histogram { count, .. }
            | DataPointValue::ExponentialHistogram { count, .. }
            | DataPointValue::Summary { count, .. } => Some(*count),
        }
    }

    /// Returns the sum of a distribution value, if known.
    pub fn sum(&self) -> Option<f64> {
        match self {
            DataPointValue::Int(_) | DataPointValue::Double(_) => None,
            DataPointValue::Histogram { sum, .. } | DataPointValue::ExponentialHistogram { sum, .. } => *sum,
            DataPointValue::Summary { sum, .. } => Some(*sum),
        }
    }
}

/// A data point.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPoint {
    attributes: Attributes,
    start_time_unix_nano: u64,
    time_unix_nano: u64,
    value: DataPointValue,
    flags: u32,
}

impl DataPoint {
    /// Creates a new `DataPoint` with the given value.
    pub fn new(value: DataPointValue) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// Sets the attributes.
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Sets the start and end timestamps.
    pub fn with_timestamps(mut self, start_time_unix_nano: u64, time_unix_nano: u64) -> Self {
        self.start_time_unix_nano = start_time_unix_nano;
        self.time_unix_nano = time_unix_nano;
        self
    }

    /// Sets the data point flags.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Returns the attributes.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the start timestamp.
    pub fn start_time_unix_nano(&self) -> u64 {
        self.start_time_unix_nano
    }

    /// Returns the timestamp.
    pub fn time_unix_nano(&self) -> u64 {
        self.time_unix_nano
    }

    /// Returns the value.
    pub fn value(&self) -> &DataPointValue {
        &self.value
    }

    /// Returns the data point flags.
    pub fn flags(&self) -> u32 {
        self.flags
    }
}

/// A metric.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metric {
    name: String,
    description: String,
    unit: String,
    #[serde(rename = "type")]
    metric_type: MetricType,
    aggregation_temporality: AggregationTemporality,
    is_monotonic: bool,
    data_points: Vec<DataPoint>,
}

impl Metric {
    /// Creates a new `Metric` with the given name and type.
    pub fn new(name: impl Into<String>, metric_type: MetricType) -> Self {
        Self {
            name: name.into(),
            metric_type,
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the unit.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the aggregation temporality and monotonicity.
    pub fn with_aggregation(mut self, temporality: AggregationTemporality, is_monotonic: bool) -> Self {
        self.aggregation_temporality = temporality;
        self.is_monotonic = is_monotonic;
        self
    }

    /// Sets the data points.
    pub fn with_data_points(mut self, data_points: Vec<DataPoint>) -> Self {
        self.data_points = data_points;
        self
    }

    /// Returns the name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the unit.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Returns the data type.
    pub fn metric_type(&self) -> MetricType {
        self.metric_type
    }

    /// Returns the aggregation temporality.
    pub fn aggregation_temporality(&self) -> AggregationTemporality {
        self.aggregation_temporality
    }

    /// Returns `true` if the metric is a monotonic sum.
    pub fn is_monotonic(&self) -> bool {
        self.is_monotonic
    }

    /// Returns the data points.
    pub fn data_points(&self) -> &[DataPoint] {
        &self.data_points
    }

    /// Returns a mutable reference to the data points.
    pub fn data_points_mut(&mut self) -> &mut Vec<DataPoint> {
        &mut self.data_points
    }
}

/// Metrics emitted by a single instrumentation scope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeMetrics {
    scope: InstrumentationScope,
    metrics: Vec<Metric>,
}

impl ScopeMetrics {
    /// Creates a new `ScopeMetrics`.
    pub fn new(scope: InstrumentationScope, metrics: Vec<Metric>) -> Self {
        Self { scope, metrics }
    }

    /// Returns the instrumentation scope.
    pub fn scope(&self) -> &InstrumentationScope {
        &self.scope
    }

    /// Returns the metrics.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// Returns the scope along with a mutable reference to its metrics.
    pub fn split_mut(&mut self) -> (&InstrumentationScope, &mut Vec<Metric>) {
        (&self.scope, &mut self.metrics)
    }
}

/// Metrics emitted by a single resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceMetrics {
    resource: Resource,
    scope_metrics: Vec<ScopeMetrics>,
}

impl ResourceMetrics {
    /// Creates a new `ResourceMetrics`.
    pub fn new(resource: Resource, scope_metrics: Vec<ScopeMetrics>) -> Self {
        Self { resource, scope_metrics }
    }

    /// Returns the resource.
    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Returns the scopes.
    pub fn scope_metrics(&self) -> &[ScopeMetrics] {
        &self.scope_metrics
    }

    /// Returns the resource along with a mutable reference to its scopes.
    pub fn split_mut(&mut self) -> (&Resource, &mut Vec<ScopeMetrics>) {
        (&self.resource, &mut self.scope_metrics)
    }
}

/// A batch of metrics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsBatch {
    resource_metrics: Vec<ResourceMetrics>,
}

impl MetricsBatch {
    /// Creates a new `MetricsBatch`.
    pub fn new(resource_metrics: Vec<ResourceMetrics>) -> Self {
        Self { resource_metrics }
    }

    /// Returns the resources.
    pub fn resource_metrics(&self) -> &[ResourceMetrics] {
        &self.resource_metrics
    }

    /// Returns a mutable reference to the resources.
    pub fn resource_metrics_mut(&mut self) -> &mut Vec<ResourceMetrics> {
        &mut self.resource_metrics
    }

    /// Returns the total number of metrics in the batch.
    pub fn metric_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .flat_map(|rm| rm.scope_metrics.iter())
            .map(|sm| sm.metrics.len())
            .sum()
    }

    /// Returns the total number of data points in the batch.
    pub fn data_point_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .flat_map(|rm| rm.scope_metrics.iter())
            .flat_map(|sm| sm.metrics.iter())
            .map(|m| m.data_points.len())
            .sum()
    }
}
