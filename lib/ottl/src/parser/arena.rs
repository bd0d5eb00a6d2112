//! Arena-based AST storage and conversion from the boxed AST.
//!
//! Conversion is where a condition is checked against its context family:
//! - paths and enums are resolved at parse time
//! - function calls are checked and their literal arguments compiled
//! - constant sub-expressions are folded

use super::ast::*;
use super::ops::{compare, contains};
use crate::error::{InvalidTerm, UnknownEnum};
use crate::functions::{Function, Resolved};
use crate::{EvalContextFamily, ParseError, Value};

// =====================================================================================================================
// Arena Storage
// =====================================================================================================================

/// Arena storage for all AST nodes of one condition.
pub struct AstArena<F: EvalContextFamily> {
    pub bool_exprs: Vec<ArenaBoolExpr>,
    pub value_exprs: Vec<ArenaValueExpr<F>>,
    pub function_calls: Vec<ArenaFunctionCall>,
}

impl<F: EvalContextFamily> AstArena<F> {
    pub fn new() -> Self {
        Self {
            bool_exprs: Vec::new(),
            value_exprs: Vec::new(),
            function_calls: Vec::new(),
        }
    }

    #[inline]
    pub fn alloc_bool(&mut self, expr: ArenaBoolExpr) -> BoolExprRef {
        let idx = self.bool_exprs.len() as u32;
        self.bool_exprs.push(expr);
        BoolExprRef(idx)
    }

    #[inline]
    pub fn alloc_value(&mut self, expr: ArenaValueExpr<F>) -> ValueExprRef {
        let idx = self.value_exprs.len() as u32;
        self.value_exprs.push(expr);
        ValueExprRef(idx)
    }

    #[inline]
    pub fn alloc_func(&mut self, call: ArenaFunctionCall) -> FunctionCallRef {
        let idx = self.function_calls.len() as u32;
        self.function_calls.push(call);
        FunctionCallRef(idx)
    }

    #[inline]
    pub fn get_bool(&self, r: BoolExprRef) -> &ArenaBoolExpr {
        &self.bool_exprs[r.0 as usize]
    }

    #[inline]
    pub fn get_value(&self, r: ValueExprRef) -> &ArenaValueExpr<F> {
        &self.value_exprs[r.0 as usize]
    }

    #[inline]
    pub fn get_func(&self, r: FunctionCallRef) -> &ArenaFunctionCall {
        &self.function_calls[r.0 as usize]
    }

    /// Returns the literal value of a node, if it is one.
    fn literal(&self, r: ValueExprRef) -> Option<&Value<'static>> {
        match self.get_value(r) {
            ArenaValueExpr::Literal(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the literal value of a boolean node, if it is one.
    fn bool_literal(&self, r: BoolExprRef) -> Option<bool> {
        match self.get_bool(r) {
            ArenaBoolExpr::Literal(b) => Some(*b),
            _ => None,
        }
    }
}

// =====================================================================================================================
// Conversion Functions
// =====================================================================================================================

/// Converts a boxed [`BoolExpr`] into arena-based form, allocating nodes in `arena` and returning a [`BoolExprRef`].
///
/// Applies constant folding where possible: comparisons and membership tests between literals, `not` of a literal,
/// and `and`/`or` with a literal operand, so the arena may contain fewer nodes than the source had.
pub fn convert_bool_expr<F: EvalContextFamily>(
    expr: &BoolExpr, arena: &mut AstArena<F>,
) -> Result<BoolExprRef, ParseError> {
    let arena_expr = match expr {
        BoolExpr::Literal(b) => ArenaBoolExpr::Literal(*b),
        BoolExpr::Comparison { left, op, right } => {
            let absence_check = is_nil_literal(left) || is_nil_literal(right);
            let left = convert_value_expr(left, arena)?;
            let right = convert_value_expr(right, arena)?;
            if let (Some(l), Some(r)) = (arena.literal(left), arena.literal(right)) {
                let result = if !absence_check && (l.is_nil() || r.is_nil()) {
                    false
                } else {
                    compare(l, *op, r)
                };
                return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(result)));
            }
            ArenaBoolExpr::Comparison {
                left,
                op: *op,
                right,
                absence_check,
            }
        }
        BoolExpr::Membership { value, list, negated } => {
            let value = convert_value_expr(value, arena)?;
            let list = convert_value_expr(list, arena)?;
            if let (Some(v), Some(l)) = (arena.literal(value), arena.literal(list)) {
                let result = match l {
                    Value::List(items) if !v.is_nil() => contains(items, v) != *negated,
                    _ => false,
                };
                return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(result)));
            }
            ArenaBoolExpr::Membership {
                value,
                list,
                negated: *negated,
            }
        }
        BoolExpr::Term(value) => match value {
            ValueExpr::Path(_) | ValueExpr::Call(_) => {
                let value = convert_value_expr(value, arena)?;
                if let Some(v) = arena.literal(value) {
                    let result = matches!(v, Value::Bool(true));
                    return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(result)));
                }
                ArenaBoolExpr::Term(value)
            }
            _ => return InvalidTerm.fail(),
        },
        BoolExpr::Not(inner) => {
            let inner_ref = convert_bool_expr(inner, arena)?;
            // not(literal) => !literal
            if let Some(b) = arena.bool_literal(inner_ref) {
                return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(!b)));
            }
            ArenaBoolExpr::Not(inner_ref)
        }
        BoolExpr::And(left, right) => {
            let left_ref = convert_bool_expr(left, arena)?;
            let right_ref = convert_bool_expr(right, arena)?;
            // Both sides are converted even when one is a literal, so that every path in the condition is validated.
            match (arena.bool_literal(left_ref), arena.bool_literal(right_ref)) {
                (Some(false), _) | (_, Some(false)) => return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(false))),
                (Some(true), _) => return Ok(right_ref),
                (_, Some(true)) => return Ok(left_ref),
                _ => ArenaBoolExpr::And(left_ref, right_ref),
            }
        }
        BoolExpr::Or(left, right) => {
            let left_ref = convert_bool_expr(left, arena)?;
            let right_ref = convert_bool_expr(right, arena)?;
            match (arena.bool_literal(left_ref), arena.bool_literal(right_ref)) {
                (Some(true), _) | (_, Some(true)) => return Ok(arena.alloc_bool(ArenaBoolExpr::Literal(true))),
                (Some(false), _) => return Ok(right_ref),
                (_, Some(false)) => return Ok(left_ref),
                _ => ArenaBoolExpr::Or(left_ref, right_ref),
            }
        }
    };
    Ok(arena.alloc_bool(arena_expr))
}

fn is_nil_literal(expr: &ValueExpr) -> bool {
    matches!(expr, ValueExpr::Literal(Value::Nil))
}

/// Converts a boxed [`ValueExpr`] into arena-based form, allocating nodes in `arena` and returning a [`ValueExprRef`].
///
/// - Resolves paths through the context family.
/// - Resolves enums to integer literals.
/// - Folds lists whose items are all literals into a single list literal.
fn convert_value_expr<F: EvalContextFamily>(
    expr: &ValueExpr, arena: &mut AstArena<F>,
) -> Result<ValueExprRef, ParseError> {
    let arena_expr = match expr {
        ValueExpr::Literal(v) => ArenaValueExpr::Literal(v.clone()),
        ValueExpr::Path(path) => ArenaValueExpr::Path(ResolvedPath {
            full_path: path.to_string(),
            accessor: F::resolve_path(path)?,
        }),
        ValueExpr::Enum(name) => match F::resolve_enum(name) {
            Some(value) => ArenaValueExpr::Literal(Value::Int(value)),
            None => return UnknownEnum { name: name.as_str() }.fail(),
        },
        ValueExpr::List(items) => {
            let refs = items
                .iter()
                .map(|item| convert_value_expr(item, arena))
                .collect::<Result<Vec<_>, _>>()?;
            let literals = refs
                .iter()
                .map(|r| arena.literal(*r).cloned())
                .collect::<Option<Vec<_>>>();
            match literals {
                Some(values) => ArenaValueExpr::Literal(Value::List(values)),
                None => ArenaValueExpr::List(refs),
            }
        }
        ValueExpr::Call(call) => match Function::resolve(&call.name, &call.args)? {
            Resolved::Literal(value) => ArenaValueExpr::Literal(crate::helpers::apply_indexes(value, &call.indexes)),
            Resolved::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| convert_value_expr(arg, arena))
                    .collect::<Result<Vec<_>, _>>()?;
                let fc_ref = arena.alloc_func(ArenaFunctionCall {
                    function,
                    args,
                    indexes: call.indexes.clone(),
                });
                ArenaValueExpr::FunctionCall(fc_ref)
            }
        },
    };
    Ok(arena.alloc_value(arena_expr))
}
