//! Chumsky grammar for conditions.

use std::borrow::Cow;

use chumsky::prelude::*;

use super::ast::*;
use crate::lexer::Token;
use crate::Value;

/// Type alias for our input - a slice of tokens
pub type TokenInput<'src> = &'src [Token<'src>];

/// Type alias for parser extra
pub type ParserExtra<'src> = extra::Err<Rich<'src, Token<'src>>>;

/// Unescape a quoted string literal (removes quotes and handles escapes)
///
/// Recognizes `\"`, `\\`, `\n`, `\r` and `\t`. Any other escape is kept as written.
fn unescape(s: &str) -> String {
    let inner = &s[1..s.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

// =====================================================================================================================
// Parser Components
// =====================================================================================================================

/// Parser for literal values.
fn literal_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, ValueExpr, ParserExtra<'a>> + Clone {
    let string_literal = select_ref! {
        Token::StringLiteral(s) => Value::String(Cow::Owned(unescape(s)))
    };

    let number_literal = just(&Token::Minus)
        .or_not()
        .then(select_ref! {
            Token::IntLiteral(i) => Value::Int(*i),
            Token::FloatLiteral(f) => Value::Float(*f),
        })
        .map(|(neg, val)| match (neg, val) {
            (Some(_), Value::Int(i)) => Value::Int(-i),
            (Some(_), Value::Float(f)) => Value::Float(-f),
            (_, val) => val,
        });

    let other_literal = select_ref! {
        Token::BytesLiteral(b) => Value::Bytes(Cow::Owned(b.clone())),
        Token::True => Value::Bool(true),
        Token::False => Value::Bool(false),
        Token::Nil => Value::Nil,
    };

    choice((number_literal, string_literal, other_literal)).map(ValueExpr::Literal)
}

/// Parser for index expressions: "[" (string | int) "]"
fn index_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, IndexExpr, ParserExtra<'a>> + Clone {
    select_ref! {
        Token::StringLiteral(s) => IndexExpr::String(unescape(s)),
        Token::IntLiteral(i) => IndexExpr::Int(usize::try_from(*i).unwrap_or(usize::MAX)),
    }
    .delimited_by(just(&Token::LBracket), just(&Token::RBracket))
}

/// Parser for identifiers (lower or upper case)
fn ident_parser<'a>(upper: bool) -> impl chumsky::Parser<'a, TokenInput<'a>, String, ParserExtra<'a>> + Clone {
    if upper {
        select_ref! { Token::UpperIdent(s) => s.to_string() }.boxed()
    } else {
        select_ref! { Token::LowerIdent(s) => s.to_string() }.boxed()
    }
}

/// Parser for path expressions: lower_ident ("." ident_segment)* index*
fn path_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, PathExpr, ParserExtra<'a>> + Clone {
    let ident_segment = ident_parser(false).or(ident_parser(true));

    ident_parser(false)
        .then(
            just(&Token::Dot)
                .ignore_then(ident_segment)
                .repeated()
                .collect::<Vec<_>>(),
        )
        .then(index_parser().repeated().collect::<Vec<_>>())
        .map(|((first, rest), indexes)| {
            let mut segments = vec![first];
            segments.extend(rest);
            PathExpr { segments, indexes }
        })
}

/// Parser for comparison operators
fn comp_op_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, CompOp, ParserExtra<'a>> + Clone {
    choice((
        just(&Token::Eq).to(CompOp::Eq),
        just(&Token::NotEq).to(CompOp::NotEq),
        just(&Token::LessEq).to(CompOp::LessEq),
        just(&Token::GreaterEq).to(CompOp::GreaterEq),
        just(&Token::Less).to(CompOp::Less),
        just(&Token::Greater).to(CompOp::Greater),
    ))
}

/// Parser for values: call | list | enum | path | literal
fn value_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, ValueExpr, ParserExtra<'a>> + Clone {
    recursive(|value_expr| {
        let list = value_expr
            .clone()
            .separated_by(just(&Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(&Token::LBracket), just(&Token::RBracket))
            .map(ValueExpr::List);

        let call = ident_parser(true)
            .then(
                value_expr
                    .separated_by(just(&Token::Comma))
                    .allow_trailing()
                    .collect::<Vec<_>>()
                    .delimited_by(just(&Token::LParen), just(&Token::RParen)),
            )
            .then(index_parser().repeated().collect::<Vec<_>>())
            .map(|((name, args), indexes)| ValueExpr::Call(Box::new(CallExpr { name, args, indexes })));

        let enum_value = ident_parser(true).map(ValueExpr::Enum);

        choice((
            call,
            list,
            enum_value,
            path_parser().map(ValueExpr::Path),
            literal_parser(),
        ))
    })
}

// =====================================================================================================================
// Main Parser
// =====================================================================================================================

/// Build the chumsky parser for a single condition.
pub fn build_parser<'a>() -> impl chumsky::Parser<'a, TokenInput<'a>, BoolExpr, ParserExtra<'a>> {
    let value_expr = value_parser();
    let comp_op = comp_op_parser();

    let bool_expr = recursive(move |bool_expr| {
        let comparison = value_expr
            .clone()
            .then(comp_op.clone())
            .then(value_expr.clone())
            .map(|((left, op), right)| BoolExpr::Comparison { left, op, right });

        let membership = value_expr
            .clone()
            .then(just(&Token::Not).or_not())
            .then_ignore(just(&Token::In))
            .then(value_expr.clone())
            .map(|((value, not), list)| BoolExpr::Membership {
                value,
                list,
                negated: not.is_some(),
            });

        let bool_literal = select_ref! {
            Token::True => BoolExpr::Literal(true),
            Token::False => BoolExpr::Literal(false),
        };

        // Only paths and calls are valid here; anything else is rejected when converting to the arena.
        let term = value_expr.clone().map(BoolExpr::Term);

        let bool_primary = choice((
            bool_expr.delimited_by(just(&Token::LParen), just(&Token::RParen)),
            comparison,
            membership,
            bool_literal,
            term,
        ));

        let bool_factor = recursive(|bool_factor| {
            just(&Token::Not)
                .ignore_then(bool_factor)
                .map(|expr| BoolExpr::Not(Box::new(expr)))
                .or(bool_primary)
        });

        let bool_term = bool_factor
            .clone()
            .foldl(just(&Token::And).ignore_then(bool_factor).repeated(), |left, right| {
                BoolExpr::And(Box::new(left), Box::new(right))
            });

        bool_term
            .clone()
            .foldl(just(&Token::Or).ignore_then(bool_term).repeated(), |left, right| {
                BoolExpr::Or(Box::new(left), Box::new(right))
            })
    });

    bool_expr.then_ignore(end())
}
