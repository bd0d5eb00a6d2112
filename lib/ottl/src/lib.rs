//! Condition language for telemetry filtering.
//!
//! Conditions are boolean expressions such as `attributes["http.method"] == "GET" and severity_number < 9` that are
//! compiled once and then evaluated against many telemetry items.
//!
//! The crate knows nothing about the shape of the telemetry itself. Each signal kind provides an
//! [`EvalContextFamily`]: the context type borrowed for one evaluation, the set of paths that can be read from it,
//! and the enum names it understands. Paths and enums are resolved while parsing, so an unknown path is a parse error
//! and evaluation never needs to look anything up by name.
//!
//! Evaluation is infallible. Reading a path that is absent from the item yields [`Value::Nil`], and every comparison
//! involving a nil operand is false unless the other side is the literal `nil`.
//!
//! # Example
//!
//! ```ignore
//! use ottl::ConditionSequence;
//!
//! let conditions = ConditionSequence::<LogRecordFamily>::parse([
//!     r#"attributes["env"] == "dev""#,
//!     "severity_number < SEVERITY_NUMBER_INFO",
//! ])?;
//!
//! if conditions.evaluate(&ctx) {
//!     // drop the record
//! }
//! ```
#![deny(missing_docs)]

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

mod error;
pub use self::error::{ConditionError, ParseError};

mod functions;
pub mod helpers;
pub(crate) mod lexer;

mod parser;
pub use self::parser::{CompOp, Condition, ConditionSequence, IndexExpr, PathExpr};

#[cfg(test)]
mod tests;

// =====================================================================================================================
// Value Types
// =====================================================================================================================

/// A value produced while evaluating a condition.
///
/// Values borrow from the item under evaluation (or from the compiled condition) wherever possible.
#[derive(Clone, Default, Debug, PartialEq)]
pub enum Value<'a> {
    /// Absent value.
    #[default]
    Nil,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(Cow<'a, str>),
    /// Raw bytes, such as trace and span identifiers.
    Bytes(Cow<'a, [u8]>),
    /// List of values.
    List(Vec<Value<'a>>),
    /// Map of string keys to values.
    Map(HashMap<Cow<'a, str>, Value<'a>>),
}

impl<'a> Value<'a> {
    /// Creates a string value borrowing `s`.
    pub fn str(s: &'a str) -> Self {
        Value::String(Cow::Borrowed(s))
    }

    /// Creates a bytes value borrowing `b`.
    pub fn bytes(b: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(b))
    }

    /// Returns `true` if the value is absent.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a copy of this value that borrows from `self` instead of cloning strings and bytes.
    pub fn as_borrowed(&self) -> Value<'_> {
        match self {
            Value::Nil => Value::Nil,
            Value::Bool(b) => Value::Bool(*b),
            Value::Int(i) => Value::Int(*i),
            Value::Float(f) => Value::Float(*f),
            Value::String(s) => Value::String(Cow::Borrowed(s.as_ref())),
            Value::Bytes(b) => Value::Bytes(Cow::Borrowed(b.as_ref())),
            Value::List(items) => Value::List(items.iter().map(Value::as_borrowed).collect()),
            Value::Map(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_ref()), v.as_borrowed()))
                    .collect(),
            ),
        }
    }

    /// Returns the string form of a scalar value, or `None` for nil, lists, and maps.
    ///
    /// Bytes are rendered as lowercase hex.
    pub fn to_scalar_string(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::String(s) => Some(Cow::Borrowed(s.as_ref())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Int(i) => Some(Cow::Owned(i.to_string())),
            Value::Float(f) => Some(Cow::Owned(f.to_string())),
            Value::Bytes(b) => Some(Cow::Owned(hex::encode(b))),
            Value::Nil | Value::List(_) | Value::Map(_) => None,
        }
    }
}

// =====================================================================================================================
// Context Binding
// =====================================================================================================================

/// A family of evaluation contexts for one signal kind.
///
/// The family is a marker type tying together the borrowed context type, the resolved path type, and the enum names
/// available to conditions compiled for that signal kind.
pub trait EvalContextFamily: Sized + 'static {
    /// Context for a single evaluation, borrowing the item under evaluation for `'a`.
    type Context<'a>;

    /// A path resolved at parse time.
    type Path: PathAccessor<Self>;

    /// Resolves a path expression.
    ///
    /// # Errors
    ///
    /// If the path is not part of this family's vocabulary, or is indexed in a way the path does not support, an
    /// error is returned.
    fn resolve_path(path: &PathExpr) -> Result<Self::Path, ParseError>;

    /// Resolves an enum name, such as `SPAN_KIND_SERVER`, to its integer value.
    fn resolve_enum(name: &str) -> Option<i64>;
}

/// Reads a resolved path from a context.
pub trait PathAccessor<F: EvalContextFamily>: fmt::Debug + Send + Sync {
    /// Returns the value at this path, or [`Value::Nil`] if it is absent.
    fn get<'a>(&self, ctx: &F::Context<'a>) -> Value<'a>;
}
