use std::fmt;

use ottl::ConditionError;
use snafu::Snafu;

/// A single problem found while validating a filter configuration.
///
/// Every error names the location in the configuration it applies to, such as `logs.include` or `traces.span`.
#[derive(Debug, Snafu)]
#[snafu(context(suffix(false)), visibility(pub(crate)))]
pub enum ConfigError {
    /// A pattern is not a valid regular expression.
    #[snafu(display("{}: invalid pattern '{}': {}", location, pattern, source))]
    InvalidPattern {
        /// Configuration block containing the pattern.
        location: &'static str,

        /// The pattern as written.
        pattern: String,

        /// Underlying regular expression error.
        source: regex::Error,
    },

    /// An attribute value that is not a string was given where a regular expression was expected.
    #[snafu(display(
        "{}: value of attribute '{}' must be a string when match_type is regexp",
        location,
        key
    ))]
    NonStringPattern {
        /// Configuration block containing the attribute.
        location: &'static str,

        /// Attribute key.
        key: String,
    },

    /// A match properties block has no predicates.
    #[snafu(display("{}: at least one of {} must be specified", location, fields))]
    EmptyMatchProperties {
        /// Configuration block.
        location: &'static str,

        /// Fields that could have been set.
        fields: &'static str,
    },

    /// A match properties field was set that the block's match type does not use.
    #[snafu(display("{}: {} cannot be used when match_type is {}", location, field, match_type))]
    IncompatibleField {
        /// Configuration block.
        location: &'static str,

        /// The offending field.
        field: &'static str,

        /// The configured match type.
        match_type: &'static str,
    },

    /// A severity name or number is not recognized.
    #[snafu(display("{}: '{}' is not a valid severity", location, severity))]
    InvalidSeverity {
        /// Configuration block.
        location: &'static str,

        /// The severity as written.
        severity: String,
    },

    /// A condition failed to parse.
    #[snafu(display("{}: {}", location, source))]
    InvalidCondition {
        /// Condition list containing the condition.
        location: &'static str,

        /// Underlying parse error.
        source: ConditionError,
    },

    /// Both match properties and conditions were configured for the same signal.
    #[snafu(display("cannot use conditions and include/exclude for {} at the same time", signal))]
    MutuallyExclusive {
        /// Signal kind.
        signal: &'static str,
    },
}

/// Every problem found while validating a filter configuration.
///
/// Validation never stops at the first error: each configuration block is checked independently, and all errors are
/// reported together.
#[derive(Debug)]
pub struct ConfigurationErrors {
    errors: Vec<ConfigError>,
}

impl ConfigurationErrors {
    /// Returns `Ok(())` if `errors` is empty, or the aggregated error otherwise.
    pub(crate) fn from_errors(errors: Vec<ConfigError>) -> Result<(), Self> {
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Self { errors })
        }
    }

    /// Returns the individual errors, in the order they were found.
    pub fn errors(&self) -> &[ConfigError] {
        &self.errors
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns `true` if there are no errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ConfigurationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid filter configuration ({} error(s))", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n- {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationErrors {}

impl IntoIterator for ConfigurationErrors {
    type Item = ConfigError;
    type IntoIter = std::vec::IntoIter<ConfigError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
