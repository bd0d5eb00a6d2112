//! Telemetry data model for Sieve.
//!
//! Every signal shares the same nesting: a batch holds resources, each resource holds instrumentation scopes, and each
//! scope holds the items (log records, spans, or metrics) emitted under it. Spans additionally carry span events, and
//! metrics carry data points.
#![deny(missing_docs)]

mod attributes;
pub use self::attributes::Attributes;

mod ids;
pub use self::ids::{SpanId, TraceId};

pub mod logs;
pub mod metrics;

mod resource;
pub use self::resource::{InstrumentationScope, Resource};

pub mod traces;

mod value;
pub use self::value::AttributeValue;
