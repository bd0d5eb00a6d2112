//! Comparison operations.
//!
//! Used by both constant folding (arena.rs) and runtime evaluation (eval.rs).

use super::ast::CompOp;
use crate::Value;

/// Compares two values.
///
/// Numbers compare numerically across integer and float, and strings compare lexicographically. Booleans, nil, bytes,
/// lists, and maps only support `==` and `!=`. Values of different types are unequal and unordered, so `!=` is the only
/// operator that holds between them.
#[inline]
pub fn compare(left: &Value<'_>, op: CompOp, right: &Value<'_>) -> bool {
    match (left, right) {
        (Value::Int(l), Value::Int(r)) => cmp_ord(l, r, op),
        (Value::Float(l), Value::Float(r)) => cmp_ord(l, r, op),
        (Value::Int(l), Value::Float(r)) => cmp_ord(&(*l as f64), r, op),
        (Value::Float(l), Value::Int(r)) => cmp_ord(l, &(*r as f64), op),
        (Value::String(l), Value::String(r)) => cmp_ord(l, r, op),
        (Value::Bool(l), Value::Bool(r)) => cmp_eq_only(l, r, op),
        (Value::Nil, Value::Nil) => cmp_eq_only(&(), &(), op),
        (Value::Bytes(l), Value::Bytes(r)) => cmp_eq_only(l, r, op),
        (Value::List(l), Value::List(r)) => cmp_eq_only(l, r, op),
        (Value::Map(l), Value::Map(r)) => cmp_eq_only(l, r, op),
        _ => matches!(op, CompOp::NotEq),
    }
}

/// Compare values that support full ordering.
#[inline]
fn cmp_ord<T: PartialOrd + ?Sized>(l: &T, r: &T, op: CompOp) -> bool {
    match op {
        CompOp::Eq => l == r,
        CompOp::NotEq => l != r,
        CompOp::Less => l < r,
        CompOp::Greater => l > r,
        CompOp::LessEq => l <= r,
        CompOp::GreaterEq => l >= r,
    }
}

/// Compare values that only support equality. Ordering operators are always false.
#[inline]
fn cmp_eq_only<T: PartialEq + ?Sized>(l: &T, r: &T, op: CompOp) -> bool {
    match op {
        CompOp::Eq => l == r,
        CompOp::NotEq => l != r,
        _ => false,
    }
}

/// Returns `true` if `list` contains an element equal to `value`.
#[inline]
pub fn contains(list: &[Value<'_>], value: &Value<'_>) -> bool {
    list.iter().any(|item| compare(item, CompOp::Eq, value))
}
