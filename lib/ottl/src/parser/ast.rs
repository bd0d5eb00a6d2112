//! AST type definitions.
//!
//! Contains both the boxed types produced by the grammar and the arena-based types used during evaluation.

use std::fmt;

use crate::functions::Function;
use crate::{EvalContextFamily, Value};

// =====================================================================================================================
// Shared Types
// =====================================================================================================================

/// Comparison operators.
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub enum CompOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
}

/// Index into a path or function result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexExpr {
    /// String index like `["key"]`.
    String(String),
    /// Integer index like `[0]`.
    Int(usize),
}

/// Path expression, such as `resource.attributes["host.name"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    /// Dotted segments of the path, e.g. `["resource", "attributes"]`.
    pub segments: Vec<String>,

    /// Indexes applied after the last segment.
    pub indexes: Vec<IndexExpr>,
}

impl PathExpr {
    /// Returns the segments as string slices, for matching against a fixed vocabulary.
    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))?;
        for index in &self.indexes {
            match index {
                IndexExpr::String(key) => write!(f, "[{:?}]", key)?,
                IndexExpr::Int(i) => write!(f, "[{}]", i)?,
            }
        }
        Ok(())
    }
}

// =====================================================================================================================
// Arena-based AST Types (used during evaluation)
// u32 indexes keep the nodes compact.
// =====================================================================================================================

/// Index into the arena for boolean nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolExprRef(pub(crate) u32);

/// Index into the arena for value nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueExprRef(pub(crate) u32);

/// Index into the arena for function calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionCallRef(pub(crate) u32);

/// Path resolved at parse time.
pub struct ResolvedPath<F: EvalContextFamily> {
    /// Path as written, for diagnostics.
    pub full_path: String,

    /// Accessor provided by the context family.
    pub accessor: F::Path,
}

impl<F: EvalContextFamily> fmt::Debug for ResolvedPath<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedPath")
            .field("full_path", &self.full_path)
            .field("accessor", &self.accessor)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum ArenaBoolExpr {
    Literal(bool),
    Comparison {
        left: ValueExprRef,
        op: CompOp,
        right: ValueExprRef,
        /// One side is the literal `nil`, so nil operands are compared rather than failing the comparison.
        absence_check: bool,
    },
    Membership {
        value: ValueExprRef,
        list: ValueExprRef,
        negated: bool,
    },
    /// Path or function call that must evaluate to `true`.
    Term(ValueExprRef),
    Not(BoolExprRef),
    And(BoolExprRef, BoolExprRef),
    Or(BoolExprRef, BoolExprRef),
}

pub enum ArenaValueExpr<F: EvalContextFamily> {
    Literal(Value<'static>),
    Path(ResolvedPath<F>),
    List(Vec<ValueExprRef>),
    FunctionCall(FunctionCallRef),
}

#[derive(Debug)]
pub struct ArenaFunctionCall {
    pub function: Function,
    pub args: Vec<ValueExprRef>,
    pub indexes: Vec<IndexExpr>,
}

// =====================================================================================================================
// Boxed AST Node Types (produced by the grammar, then converted to arena)
// =====================================================================================================================

/// Function call, such as `IsMatch(name, "^GET")`.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub name: String,
    pub args: Vec<ValueExpr>,
    pub indexes: Vec<IndexExpr>,
}

#[derive(Debug, Clone)]
pub enum ValueExpr {
    Literal(Value<'static>),
    Path(PathExpr),
    List(Vec<ValueExpr>),
    /// Uppercase identifier not followed by an argument list.
    Enum(String),
    Call(Box<CallExpr>),
}

#[derive(Debug, Clone)]
pub enum BoolExpr {
    Literal(bool),
    Comparison {
        left: ValueExpr,
        op: CompOp,
        right: ValueExpr,
    },
    Membership {
        value: ValueExpr,
        list: ValueExpr,
        negated: bool,
    },
    Term(ValueExpr),
    Not(Box<BoolExpr>),
    And(Box<BoolExpr>, Box<BoolExpr>),
    Or(Box<BoolExpr>, Box<BoolExpr>),
}
