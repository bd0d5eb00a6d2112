//! Built-in functions.
//!
//! The set of functions is closed. Each call is checked for arity when the condition is parsed, and arguments that
//! select behavior (the `IsMatch` pattern, the `ConvertCase` case, identifier literals) must be literals so they can be
//! validated and compiled up front.

use std::borrow::Cow;

use regex::Regex;

use crate::error::{Arity, InvalidArgument, UnknownFunction};
use crate::parser::ast::ValueExpr;
use crate::parser::ops;
use crate::{CompOp, ParseError, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
}

/// A built-in function with its parse-time arguments already applied.
#[derive(Debug)]
pub enum Function {
    /// `IsMatch(target, "pattern")`
    IsMatch(Regex),
    /// `Contains(target, needle)`
    Contains,
    /// `HasPrefix(target, prefix)`
    HasPrefix,
    /// `HasSuffix(target, suffix)`
    HasSuffix,
    /// `Len(target)`
    Len,
    /// `Concat([values], delimiter)`
    Concat,
    /// `ConvertCase(target, "lower" | "upper")`
    ConvertCase(Case),
    /// `Int(value)`
    Int,
    IsString,
    IsBool,
    IsInt,
    IsDouble,
    IsMap,
    IsList,
}

/// Outcome of resolving a call at parse time.
pub enum Resolved<'e> {
    /// The call is evaluated per item, with the given runtime arguments.
    Call { function: Function, args: &'e [ValueExpr] },

    /// The call reduces to a constant.
    Literal(Value<'static>),
}

impl Function {
    /// Resolves a call by name, validating its arguments.
    pub fn resolve<'e>(name: &str, args: &'e [ValueExpr]) -> Result<Resolved<'e>, ParseError> {
        let call = |function: Function, expected: usize| -> Result<Resolved<'e>, ParseError> {
            check_arity(function.name(), expected, args)?;
            Ok(Resolved::Call { function, args })
        };

        match name {
            "IsMatch" => {
                check_arity("IsMatch", 2, args)?;
                let pattern = string_literal("IsMatch", &args[1])?;
                let regex = Regex::new(pattern).map_err(|e| {
                    InvalidArgument {
                        name: "IsMatch",
                        reason: e.to_string(),
                    }
                    .build()
                })?;
                Ok(Resolved::Call {
                    function: Function::IsMatch(regex),
                    args: &args[..1],
                })
            }
            "ConvertCase" => {
                check_arity("ConvertCase", 2, args)?;
                let case = match string_literal("ConvertCase", &args[1])? {
                    "lower" => Case::Lower,
                    "upper" => Case::Upper,
                    other => {
                        return InvalidArgument {
                            name: "ConvertCase",
                            reason: format!("unknown case \"{}\", expected \"lower\" or \"upper\"", other),
                        }
                        .fail()
                    }
                };
                Ok(Resolved::Call {
                    function: Function::ConvertCase(case),
                    args: &args[..1],
                })
            }
            "TraceID" => id_literal("TraceID", 16, args),
            "SpanID" => id_literal("SpanID", 8, args),
            "Contains" => call(Function::Contains, 2),
            "HasPrefix" => call(Function::HasPrefix, 2),
            "HasSuffix" => call(Function::HasSuffix, 2),
            "Len" => call(Function::Len, 1),
            "Concat" => call(Function::Concat, 2),
            "Int" => call(Function::Int, 1),
            "IsString" => call(Function::IsString, 1),
            "IsBool" => call(Function::IsBool, 1),
            "IsInt" => call(Function::IsInt, 1),
            "IsDouble" => call(Function::IsDouble, 1),
            "IsMap" => call(Function::IsMap, 1),
            "IsList" => call(Function::IsList, 1),
            _ => UnknownFunction { name }.fail(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Function::IsMatch(_) => "IsMatch",
            Function::Contains => "Contains",
            Function::HasPrefix => "HasPrefix",
            Function::HasSuffix => "HasSuffix",
            Function::Len => "Len",
            Function::Concat => "Concat",
            Function::ConvertCase(_) => "ConvertCase",
            Function::Int => "Int",
            Function::IsString => "IsString",
            Function::IsBool => "IsBool",
            Function::IsInt => "IsInt",
            Function::IsDouble => "IsDouble",
            Function::IsMap => "IsMap",
            Function::IsList => "IsList",
        }
    }

    /// Invokes the function. `arg(i)` evaluates the i-th runtime argument.
    ///
    /// Functions never fail: arguments of an unsupported type produce `false` for predicates and nil otherwise.
    pub fn call<'r>(&self, arg: impl Fn(usize) -> Value<'r>) -> Value<'r> {
        match self {
            Function::IsMatch(regex) => {
                let target = arg(0);
                let matched = target.to_scalar_string().is_some_and(|s| regex.is_match(&s));
                Value::Bool(matched)
            }
            Function::Contains => {
                let (target, needle) = (arg(0), arg(1));
                let found = match (&target, &needle) {
                    (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_ref()),
                    (Value::List(items), needle) if !needle.is_nil() => ops::contains(items, needle),
                    _ => false,
                };
                Value::Bool(found)
            }
            Function::HasPrefix => match (arg(0), arg(1)) {
                (Value::String(s), Value::String(prefix)) => Value::Bool(s.starts_with(prefix.as_ref())),
                _ => Value::Bool(false),
            },
            Function::HasSuffix => match (arg(0), arg(1)) {
                (Value::String(s), Value::String(suffix)) => Value::Bool(s.ends_with(suffix.as_ref())),
                _ => Value::Bool(false),
            },
            Function::Len => match arg(0) {
                Value::String(s) => len_value(s.len()),
                Value::Bytes(b) => len_value(b.len()),
                Value::List(items) => len_value(items.len()),
                Value::Map(map) => len_value(map.len()),
                _ => Value::Nil,
            },
            Function::Concat => {
                let (values, delimiter) = (arg(0), arg(1));
                match (values, delimiter.as_str()) {
                    (Value::List(items), Some(delimiter)) => {
                        let parts = items
                            .iter()
                            .map(|item| item.to_scalar_string().unwrap_or_default())
                            .collect::<Vec<_>>();
                        Value::String(Cow::Owned(parts.join(delimiter)))
                    }
                    _ => Value::Nil,
                }
            }
            Function::ConvertCase(case) => match arg(0) {
                Value::String(s) => Value::String(Cow::Owned(match case {
                    Case::Lower => s.to_lowercase(),
                    Case::Upper => s.to_uppercase(),
                })),
                _ => Value::Nil,
            },
            Function::Int => match arg(0) {
                Value::Int(i) => Value::Int(i),
                Value::Float(f) if f.is_finite() => Value::Int(f.trunc() as i64),
                Value::Bool(b) => Value::Int(i64::from(b)),
                Value::String(s) => s.trim().parse::<i64>().map(Value::Int).unwrap_or(Value::Nil),
                _ => Value::Nil,
            },
            Function::IsString => Value::Bool(matches!(arg(0), Value::String(_))),
            Function::IsBool => Value::Bool(matches!(arg(0), Value::Bool(_))),
            Function::IsInt => Value::Bool(matches!(arg(0), Value::Int(_))),
            Function::IsDouble => Value::Bool(matches!(arg(0), Value::Float(_))),
            Function::IsMap => Value::Bool(matches!(arg(0), Value::Map(_))),
            Function::IsList => Value::Bool(matches!(arg(0), Value::List(_))),
        }
    }
}

fn len_value(len: usize) -> Value<'static> {
    Value::Int(i64::try_from(len).unwrap_or(i64::MAX))
}

fn check_arity(name: &'static str, expected: usize, args: &[ValueExpr]) -> Result<(), ParseError> {
    if args.len() == expected {
        Ok(())
    } else {
        Arity {
            name,
            expected,
            actual: args.len(),
        }
        .fail()
    }
}

fn string_literal<'e>(name: &'static str, arg: &'e ValueExpr) -> Result<&'e str, ParseError> {
    match arg {
        ValueExpr::Literal(Value::String(s)) => Ok(s.as_ref()),
        _ => InvalidArgument {
            name,
            reason: "expected a string literal",
        }
        .fail(),
    }
}

fn id_literal(name: &'static str, len: usize, args: &[ValueExpr]) -> Result<Resolved<'static>, ParseError> {
    check_arity(name, 1, args)?;
    match &args[0] {
        ValueExpr::Literal(Value::Bytes(bytes)) if bytes.len() == len => Ok(Resolved::Literal(Value::Bytes(bytes.clone()))),
        _ => InvalidArgument {
            name,
            reason: format!("expected a {}-byte literal such as 0x{}", len, "00".repeat(len)),
        }
        .fail(),
    }
}
