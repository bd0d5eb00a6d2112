use snafu::Snafu;

use crate::PathExpr;

/// Error produced while compiling a condition.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum ParseError {
    /// The input contained characters that do not form a valid token.
    #[snafu(display("invalid token '{}' at offset {}", slice, position))]
    InvalidToken {
        /// Byte offset of the invalid token.
        position: usize,

        /// The invalid input.
        slice: String,
    },

    /// The tokens did not form a valid condition.
    #[snafu(display("syntax error: {}", messages.join("; ")))]
    Syntax {
        /// One message per problem reported by the parser.
        messages: Vec<String>,
    },

    /// The path is not part of the context's vocabulary.
    #[snafu(display("unknown path '{}'", path))]
    UnknownPath {
        /// The path as written.
        path: String,
    },

    /// The path exists but was used in an unsupported way, such as indexing a scalar field.
    #[snafu(display("invalid path '{}': {}", path, reason))]
    InvalidPath {
        /// The path as written.
        path: String,

        /// Why the path is invalid.
        reason: String,
    },

    /// The identifier is neither a known function nor a known enum.
    #[snafu(display("unknown enum '{}'", name))]
    UnknownEnum {
        /// Enum name as written.
        name: String,
    },

    /// The function does not exist.
    #[snafu(display("unknown function '{}'", name))]
    UnknownFunction {
        /// Function name as written.
        name: String,
    },

    /// The function was called with the wrong number of arguments.
    #[snafu(display("function '{}' expects {} argument(s), got {}", name, expected, actual))]
    Arity {
        /// Function name.
        name: &'static str,

        /// Number of arguments the function takes.
        expected: usize,

        /// Number of arguments supplied.
        actual: usize,
    },

    /// An argument that must be known at parse time was invalid.
    #[snafu(display("invalid argument to '{}': {}", name, reason))]
    InvalidArgument {
        /// Function name.
        name: &'static str,

        /// Why the argument is invalid.
        reason: String,
    },

    /// A value that is not a path or function call was used where a boolean was expected.
    #[snafu(display("expected a comparison, a boolean path, or a function call"))]
    InvalidTerm,
}

impl ParseError {
    /// Creates an error for a path that is not part of the context's vocabulary.
    pub fn unknown_path(path: &PathExpr) -> Self {
        Self::UnknownPath { path: path.to_string() }
    }

    /// Creates an error for a path that exists but was used in an unsupported way.
    pub fn invalid_path(path: &PathExpr, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// A condition that failed to compile.
#[derive(Debug, Snafu)]
#[snafu(display("failed to parse condition \"{}\": {}", condition, source))]
pub struct ConditionError {
    condition: String,
    source: ParseError,
}

impl ConditionError {
    pub(crate) fn new(condition: impl Into<String>, source: ParseError) -> Self {
        Self {
            condition: condition.into(),
            source,
        }
    }

    /// Returns the condition as written.
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Returns the underlying parse error.
    pub fn parse_error(&self) -> &ParseError {
        &self.source
    }
}
