//! Attribute matching.

use serde::Deserialize;
use sieve_data::{AttributeValue, Attributes};

use crate::error::{ConfigError, NonStringPattern};
use crate::filterset::{MatchType, Matcher};

/// An attribute predicate as written in configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeConfig {
    /// Attribute key that must be present.
    pub key: String,

    /// Optional value the attribute must have.
    ///
    /// Under `match_type: regexp`, this must be a string holding the pattern.
    #[serde(default)]
    pub value: Option<AttributeValue>,
}

/// Matches an attribute set containing a key, optionally with a matching value.
#[derive(Clone, Debug)]
pub struct AttributeMatcher {
    key: String,
    value: Option<Matcher>,
}

impl AttributeMatcher {
    /// Creates a matcher for `key` with an optional value matcher.
    pub fn new(key: impl Into<String>, value: Option<Matcher>) -> Self {
        Self { key: key.into(), value }
    }

    /// Returns `true` if `attributes` contains the key and, when a value matcher is configured, the canonical string
    /// form of the attribute value matches it.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        match attributes.get(&self.key) {
            None => false,
            Some(value) => match &self.value {
                None => true,
                Some(matcher) => matcher.test(&value.to_canonical_string()),
            },
        }
    }

    fn compile(
        location: &'static str, config: &AttributeConfig, match_type: MatchType, errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let pattern = match (&config.value, match_type) {
            (None, _) => return Some(Self::new(&config.key, None)),
            (Some(AttributeValue::String(pattern)), _) => pattern.clone(),
            (Some(_), MatchType::Regexp) => {
                errors.push(
                    NonStringPattern {
                        location,
                        key: &config.key,
                    }
                    .build(),
                );
                return None;
            }
            (Some(value), MatchType::Strict) => value.to_canonical_string().into_owned(),
        };

        match Matcher::compile(&pattern, match_type) {
            Ok(matcher) => Some(Self::new(&config.key, Some(matcher))),
            Err(source) => {
                errors.push(ConfigError::InvalidPattern {
                    location,
                    pattern,
                    source,
                });
                None
            }
        }
    }
}

/// How the matchers of an [`AttributesMatcher`] are combined.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Quantifier {
    /// Every matcher must match.
    All,

    /// At least one matcher must match.
    Any,
}

/// A list of attribute matchers evaluated against one attribute set.
///
/// Resource attributes are matched with [`Quantifier::All`]: every resource predicate narrows down where telemetry came
/// from. Item attributes are matched with [`Quantifier::Any`]: each item predicate qualifies an item on its own.
///
/// An empty list places no constraint and matches every attribute set.
#[derive(Clone, Debug)]
pub struct AttributesMatcher {
    matchers: Vec<AttributeMatcher>,
    quantifier: Quantifier,
}

impl AttributesMatcher {
    /// Creates a matcher from already compiled attribute matchers.
    pub fn new(matchers: Vec<AttributeMatcher>, quantifier: Quantifier) -> Self {
        Self { matchers, quantifier }
    }

    pub(crate) fn compile(
        location: &'static str, configs: &[AttributeConfig], match_type: MatchType, quantifier: Quantifier,
        errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let before = errors.len();
        let matchers = configs
            .iter()
            .filter_map(|config| AttributeMatcher::compile(location, config, match_type, errors))
            .collect();
        (errors.len() == before).then(|| Self::new(matchers, quantifier))
    }

    /// Returns `true` if `attributes` satisfies the list.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        if self.matchers.is_empty() {
            return true;
        }
        match self.quantifier {
            Quantifier::All => self.matchers.iter().all(|m| m.matches(attributes)),
            Quantifier::Any => self.matchers.iter().any(|m| m.matches(attributes)),
        }
    }

    /// Returns `true` if there are no matchers.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> Attributes {
        Attributes::from_iter([
            ("host.name", AttributeValue::from("web-1")),
            ("port", AttributeValue::from(8080_i64)),
            ("sampled", AttributeValue::from(true)),
            ("ratio", AttributeValue::from(0.25)),
        ])
    }

    fn config(key: &str, value: Option<AttributeValue>) -> AttributeConfig {
        AttributeConfig {
            key: key.to_string(),
            value,
        }
    }

    fn compile(configs: &[AttributeConfig], match_type: MatchType, quantifier: Quantifier) -> AttributesMatcher {
        let mut errors = Vec::new();
        let matcher = AttributesMatcher::compile("test", configs, match_type, quantifier, &mut errors);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        matcher.unwrap()
    }

    #[test]
    fn key_only_requires_presence() {
        let matcher = AttributeMatcher::new("host.name", None);
        assert!(matcher.matches(&attrs()));
        assert!(!AttributeMatcher::new("missing", None).matches(&attrs()));
    }

    #[test]
    fn strict_values_compare_canonical_strings() {
        let matchers = compile(
            &[
                config("port", Some(AttributeValue::from(8080_i64))),
                config("sampled", Some(AttributeValue::from("true"))),
                config("ratio", Some(AttributeValue::from(0.25))),
            ],
            MatchType::Strict,
            Quantifier::All,
        );
        assert!(matchers.matches(&attrs()));

        let mismatch = compile(
            &[config("port", Some(AttributeValue::from(80_i64)))],
            MatchType::Strict,
            Quantifier::All,
        );
        assert!(!mismatch.matches(&attrs()));
    }

    #[test]
    fn regexp_values_match_canonical_strings() {
        let matchers = compile(
            &[config("port", Some(AttributeValue::from("^80")))],
            MatchType::Regexp,
            Quantifier::All,
        );
        assert!(matchers.matches(&attrs()));
    }

    #[test]
    fn regexp_values_must_be_strings() {
        let mut errors = Vec::new();
        let matcher = AttributesMatcher::compile(
            "spans.include",
            &[config("port", Some(AttributeValue::from(8080_i64)))],
            MatchType::Regexp,
            Quantifier::Any,
            &mut errors,
        );
        assert!(matcher.is_none());
        assert_eq!(
            errors[0].to_string(),
            "spans.include: value of attribute 'port' must be a string when match_type is regexp"
        );
    }

    #[test]
    fn quantifiers() {
        let configs = [
            config("host.name", Some(AttributeValue::from("web-1"))),
            config("missing", None),
        ];
        assert!(!compile(&configs, MatchType::Strict, Quantifier::All).matches(&attrs()));
        assert!(compile(&configs, MatchType::Strict, Quantifier::Any).matches(&attrs()));
    }

    #[test]
    fn empty_list_matches_everything() {
        let matcher = compile(&[], MatchType::Strict, Quantifier::Any);
        assert!(matcher.matches(&Attributes::new()));
        assert!(matcher.is_empty());
    }
}
