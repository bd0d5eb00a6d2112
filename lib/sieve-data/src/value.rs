use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Attributes;

/// An attribute value.
///
/// Values are deserialized from their natural JSON/YAML representation: `true`, `42`, `1.5`, `"text"`, `[...]`, and
/// `{...}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer value.
    Int(i64),
    /// Floating-point value.
    Double(f64),
    /// String value.
    String(String),
    /// Ordered list of values.
    Array(Vec<AttributeValue>),
    /// Nested attribute set.
    Map(Attributes),
}

impl AttributeValue {
    /// Returns the canonical string representation of this value.
    ///
    /// Strings are returned as-is, booleans as `true`/`false`, integers in decimal, and doubles in their shortest
    /// round-trip decimal form without an exponent. Arrays and maps are rendered as compact JSON.
    pub fn to_canonical_string(&self) -> Cow<'_, str> {
        match self {
            AttributeValue::String(s) => Cow::Borrowed(s.as_str()),
            AttributeValue::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            AttributeValue::Int(i) => Cow::Owned(i.to_string()),
            AttributeValue::Double(d) => Cow::Owned(d.to_string()),
            AttributeValue::Array(_) | AttributeValue::Map(_) => {
                Cow::Owned(serde_json::to_string(self).unwrap_or_default())
            }
        }
    }

    /// Returns the string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<Attributes> for AttributeValue {
    fn from(value: Attributes) -> Self {
        AttributeValue::Map(value)
    }
}
