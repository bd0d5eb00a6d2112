//! Condition parser.
//!
//! This module is split into submodules for maintainability:
//! - `ast`: AST type definitions (arena-based and boxed)
//! - `arena`: Arena storage and AST conversion with constant folding
//! - `grammar`: Chumsky parser
//! - `eval`: AST evaluation functions
//! - `ops`: comparison operations shared by folding and evaluation

mod arena;
pub(crate) mod ast;
mod eval;
mod grammar;
pub(crate) mod ops;

use std::fmt;

use arena::{convert_bool_expr, AstArena};
pub use ast::{CompOp, IndexExpr, PathExpr};
use ast::{ArenaBoolExpr, BoolExprRef};
use eval::evaluate_bool_expr;
use grammar::build_parser;

use crate::error::{InvalidToken, Syntax};
use crate::lexer::{tokenize, Token};
use crate::{ConditionError, EvalContextFamily, ParseError};

// =====================================================================================================================
// Condition
// =====================================================================================================================

/// A compiled condition.
///
/// Paths are resolved at parse time (not at evaluation time), so evaluating a condition performs no lookups by name.
/// Conditions are immutable once parsed and can be shared freely across threads.
pub struct Condition<F: EvalContextFamily> {
    source: String,
    arena: AstArena<F>,
    root: BoolExprRef,
}

impl<F: EvalContextFamily> Condition<F> {
    /// Parses a condition.
    ///
    /// # Errors
    ///
    /// If the condition is syntactically invalid, refers to a path or enum the context family does not know, or calls
    /// a function incorrectly, an error is returned.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let tokens_with_spans = tokenize(source).map_err(|e| {
            InvalidToken {
                position: e.position,
                slice: e.invalid_slice,
            }
            .build()
        })?;

        let (tokens, spans): (Vec<Token>, Vec<_>) = tokens_with_spans.into_iter().unzip();

        use chumsky::Parser as _;
        let ast = build_parser().parse(&tokens[..]).into_result().map_err(|errs| {
            let messages = errs
                .iter()
                .map(|err| {
                    let offset = spans
                        .get(err.span().start)
                        .map_or(source.len(), |span: &std::ops::Range<usize>| span.start);
                    match err.found() {
                        Some(token) => format!("unexpected {:?} at offset {}", token, offset),
                        None => "unexpected end of input".to_string(),
                    }
                })
                .collect::<Vec<_>>();
            Syntax { messages }.build()
        })?;

        let mut arena = AstArena::new();
        let root = convert_bool_expr(&ast, &mut arena)?;

        Ok(Self {
            source: source.to_string(),
            arena,
            root,
        })
    }

    /// Returns the condition as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the condition's value if it does not depend on the item under evaluation.
    pub fn constant_value(&self) -> Option<bool> {
        match self.arena.get_bool(self.root) {
            ArenaBoolExpr::Literal(b) => Some(*b),
            _ => None,
        }
    }

    /// Evaluates the condition against `ctx`.
    pub fn evaluate(&self, ctx: &F::Context<'_>) -> bool {
        evaluate_bool_expr(self.root, &self.arena, ctx)
    }
}

impl<F: EvalContextFamily> fmt::Debug for Condition<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").field("source", &self.source).finish()
    }
}

// =====================================================================================================================
// Condition Sequence
// =====================================================================================================================

/// An ordered list of conditions combined with `or`.
///
/// Evaluation stops at the first condition that holds. Since evaluation has no side effects, the order of the
/// conditions never changes the result.
pub struct ConditionSequence<F: EvalContextFamily> {
    conditions: Vec<Condition<F>>,
}

impl<F: EvalContextFamily> ConditionSequence<F> {
    /// Parses every statement.
    ///
    /// # Errors
    ///
    /// If any statement fails to parse, the errors for all failing statements are returned, in order.
    pub fn parse<I, S>(statements: I) -> Result<Self, Vec<ConditionError>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut conditions = Vec::new();
        let mut errors = Vec::new();

        for statement in statements {
            let statement = statement.as_ref();
            match Condition::parse(statement) {
                Ok(condition) => conditions.push(condition),
                Err(e) => errors.push(ConditionError::new(statement, e)),
            }
        }

        if errors.is_empty() {
            Ok(Self { conditions })
        } else {
            Err(errors)
        }
    }

    /// Returns `true` if any condition holds for `ctx`.
    pub fn evaluate(&self, ctx: &F::Context<'_>) -> bool {
        self.conditions.iter().any(|condition| condition.evaluate(ctx))
    }

    /// Returns the number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Returns an iterator over the conditions.
    pub fn iter(&self) -> impl Iterator<Item = &Condition<F>> {
        self.conditions.iter()
    }
}

impl<F: EvalContextFamily> fmt::Debug for ConditionSequence<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.conditions.iter()).finish()
    }
}
