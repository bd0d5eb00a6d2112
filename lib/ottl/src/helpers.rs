//! Helper utilities for context families.
//!
//! Index resolution is the responsibility of each [`crate::PathAccessor`]; these helpers implement the common behavior
//! for values that have already been converted into [`Value`].

use crate::{IndexExpr, Value};

/// Applies a sequence of index expressions to a value and returns the result.
///
/// Lists are indexed by position and maps by key. Any index that does not apply to the value it is used on, including a
/// missing key or an out-of-range position, yields [`Value::Nil`].
///
/// # Example
///
/// ```
/// use ottl::helpers::apply_indexes;
/// use ottl::{IndexExpr, Value};
///
/// let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
/// assert_eq!(apply_indexes(list.clone(), &[IndexExpr::Int(1)]), Value::Int(2));
/// assert_eq!(apply_indexes(list, &[IndexExpr::Int(5)]), Value::Nil);
/// ```
pub fn apply_indexes<'a>(value: Value<'a>, indexes: &[IndexExpr]) -> Value<'a> {
    let mut current = value;
    for index in indexes {
        current = match (current, index) {
            (Value::List(list), IndexExpr::Int(i)) => list.into_iter().nth(*i).unwrap_or_default(),
            (Value::Map(mut map), IndexExpr::String(key)) => map.remove(key.as_str()).unwrap_or_default(),
            _ => return Value::Nil,
        };
    }
    current
}
