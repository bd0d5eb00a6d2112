//! Arena-based evaluation.

use super::arena::AstArena;
use super::ast::*;
use super::ops::{compare, contains};
use crate::helpers::apply_indexes;
use crate::{EvalContextFamily, PathAccessor as _, Value};

/// Evaluate an arena-based boolean expression.
#[inline]
pub fn evaluate_bool_expr<F: EvalContextFamily>(expr_ref: BoolExprRef, arena: &AstArena<F>, ctx: &F::Context<'_>) -> bool {
    match arena.get_bool(expr_ref) {
        ArenaBoolExpr::Literal(b) => *b,
        ArenaBoolExpr::Comparison {
            left,
            op,
            right,
            absence_check,
        } => {
            let left_val = evaluate_value_expr(*left, arena, ctx);
            let right_val = evaluate_value_expr(*right, arena, ctx);
            if !absence_check && (left_val.is_nil() || right_val.is_nil()) {
                return false;
            }
            compare(&left_val, *op, &right_val)
        }
        ArenaBoolExpr::Membership { value, list, negated } => {
            let value = evaluate_value_expr(*value, arena, ctx);
            if value.is_nil() {
                return false;
            }
            match evaluate_value_expr(*list, arena, ctx) {
                Value::List(items) => contains(&items, &value) != *negated,
                _ => false,
            }
        }
        ArenaBoolExpr::Term(value_ref) => matches!(evaluate_value_expr(*value_ref, arena, ctx), Value::Bool(true)),
        ArenaBoolExpr::Not(inner_ref) => !evaluate_bool_expr(*inner_ref, arena, ctx),
        ArenaBoolExpr::And(left_ref, right_ref) => {
            evaluate_bool_expr(*left_ref, arena, ctx) && evaluate_bool_expr(*right_ref, arena, ctx)
        }
        ArenaBoolExpr::Or(left_ref, right_ref) => {
            evaluate_bool_expr(*left_ref, arena, ctx) || evaluate_bool_expr(*right_ref, arena, ctx)
        }
    }
}

/// Evaluate an arena-based value expression.
///
/// Literals are borrowed from the arena and path values from the context, so the result lives as long as the shorter
/// of the two.
#[inline]
fn evaluate_value_expr<'r, 'a: 'r, F: EvalContextFamily>(
    expr_ref: ValueExprRef, arena: &'r AstArena<F>, ctx: &F::Context<'a>,
) -> Value<'r> {
    match arena.get_value(expr_ref) {
        ArenaValueExpr::Literal(v) => v.as_borrowed(),
        ArenaValueExpr::Path(resolved_path) => resolved_path.accessor.get(ctx),
        ArenaValueExpr::List(items) => Value::List(
            items
                .iter()
                .map(|item_ref| evaluate_value_expr(*item_ref, arena, ctx))
                .collect(),
        ),
        ArenaValueExpr::FunctionCall(fc_ref) => {
            let fc = arena.get_func(*fc_ref);
            let result = fc
                .function
                .call(|i| fc.args.get(i).map_or(Value::Nil, |arg| evaluate_value_expr(*arg, arena, ctx)));
            apply_indexes(result, &fc.indexes)
        }
    }
}
