//! Log record match properties.

use std::borrow::Cow;

use serde::Deserialize;
use sieve_data::logs::{LogRecord, SeverityNumber};
use sieve_data::Resource;

use super::pattern_set;
use crate::attributes::{AttributeConfig, AttributesMatcher, Quantifier};
use crate::error::{ConfigError, EmptyMatchProperties, InvalidSeverity};
use crate::filterset::{FilterSet, MatchType, RegexpConfig};
use crate::severity::parse_severity;

/// Log record match properties, as written in configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogMatchConfig {
    /// How patterns are matched.
    pub match_type: MatchType,

    /// Result cache settings for `regexp` patterns.
    #[serde(default)]
    pub regexp: Option<RegexpConfig>,

    /// Resource attributes that must all match.
    #[serde(default)]
    pub resource_attributes: Vec<AttributeConfig>,

    /// Log record attributes, any of which must match.
    #[serde(default)]
    pub record_attributes: Vec<AttributeConfig>,

    /// Severity text patterns, any of which must match.
    #[serde(default)]
    pub severity_texts: Vec<String>,

    /// Minimum severity.
    #[serde(default)]
    pub severity_number: Option<SeverityNumberConfig>,

    /// Body patterns, any of which must match.
    #[serde(default)]
    pub bodies: Vec<String>,
}

impl LogMatchConfig {
    fn is_empty(&self) -> bool {
        self.resource_attributes.is_empty()
            && self.record_attributes.is_empty()
            && self.severity_texts.is_empty()
            && self.bodies.is_empty()
            && self.severity_number.is_none()
    }
}

/// Minimum severity settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeverityNumberConfig {
    /// Minimum severity, by name or number. Empty matches every specified severity.
    #[serde(default)]
    pub min: SeverityValue,

    /// Whether records with an unspecified severity match.
    #[serde(default)]
    pub match_undefined: bool,
}

/// A severity written either as a name or as a number.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum SeverityValue {
    /// Numeric severity, such as `9`.
    Number(u64),

    /// Severity name such as `INFO`, or a number written as a string.
    Name(String),
}

impl Default for SeverityValue {
    fn default() -> Self {
        SeverityValue::Name(String::new())
    }
}

impl SeverityValue {
    fn as_str(&self) -> Cow<'_, str> {
        match self {
            SeverityValue::Number(n) => Cow::Owned(n.to_string()),
            SeverityValue::Name(name) => Cow::Borrowed(name),
        }
    }
}

#[derive(Debug)]
struct SeverityNumberMatcher {
    min: SeverityNumber,
    match_undefined: bool,
}

impl SeverityNumberMatcher {
    fn matches(&self, severity: SeverityNumber) -> bool {
        if severity.is_unspecified() {
            return self.match_undefined;
        }
        severity >= self.min
    }
}

/// Compiled log record match properties.
#[derive(Debug)]
pub struct LogMatcher {
    resource_attributes: AttributesMatcher,
    record_attributes: AttributesMatcher,
    severity_texts: Option<FilterSet>,
    severity_number: Option<SeverityNumberMatcher>,
    bodies: Option<FilterSet>,
}

impl LogMatcher {
    pub(crate) fn compile(
        location: &'static str, config: &LogMatchConfig, errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let before = errors.len();
        if config.is_empty() {
            errors.push(
                EmptyMatchProperties {
                    location,
                    fields: "resource_attributes, record_attributes, severity_texts, severity_number or bodies",
                }
                .build(),
            );
        }

        let match_type = config.match_type;
        let regexp = config.regexp.as_ref();
        let resource_attributes = AttributesMatcher::compile(
            location,
            &config.resource_attributes,
            match_type,
            Quantifier::All,
            errors,
        );
        let record_attributes =
            AttributesMatcher::compile(location, &config.record_attributes, match_type, Quantifier::Any, errors);
        let severity_texts = pattern_set(location, &config.severity_texts, match_type, regexp, errors);
        let bodies = pattern_set(location, &config.bodies, match_type, regexp, errors);
        let severity_number = config.severity_number.as_ref().and_then(|severity| {
            let min = severity.min.as_str();
            match parse_severity(&min) {
                Some(min) => Some(SeverityNumberMatcher {
                    min,
                    match_undefined: severity.match_undefined,
                }),
                None => {
                    errors.push(InvalidSeverity { location, severity: min }.build());
                    None
                }
            }
        });

        if errors.len() != before {
            return None;
        }

        Some(Self {
            resource_attributes: resource_attributes?,
            record_attributes: record_attributes?,
            severity_texts,
            severity_number,
            bodies,
        })
    }

    /// Returns `true` if the log record satisfies every configured predicate.
    pub fn matches(&self, record: &LogRecord, resource: &Resource) -> bool {
        if !self.resource_attributes.matches(resource.attributes()) {
            return false;
        }
        if !self.record_attributes.matches(record.attributes()) {
            return false;
        }
        if let Some(severity_texts) = &self.severity_texts {
            if !severity_texts.matches(record.severity_text()) {
                return false;
            }
        }
        if let Some(severity_number) = &self.severity_number {
            if !severity_number.matches(record.severity_number()) {
                return false;
            }
        }
        if let Some(bodies) = &self.bodies {
            let body = record.body().map(|body| body.to_canonical_string()).unwrap_or_default();
            if !bodies.matches(&body) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use sieve_data::{AttributeValue, Attributes};

    use super::*;

    fn compile(yaml: &str) -> LogMatcher {
        let config: LogMatchConfig = serde_yaml::from_str(yaml).unwrap();
        let mut errors = Vec::new();
        let matcher = LogMatcher::compile("logs.include", &config, &mut errors);
        assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
        matcher.unwrap()
    }

    fn compile_errors(yaml: &str) -> Vec<String> {
        let config: LogMatchConfig = serde_yaml::from_str(yaml).unwrap();
        let mut errors = Vec::new();
        assert!(LogMatcher::compile("logs.include", &config, &mut errors).is_none());
        errors.iter().map(ToString::to_string).collect()
    }

    fn record(severity: SeverityNumber, text: &str, body: &str) -> LogRecord {
        LogRecord::new(body)
            .with_severity_number(severity)
            .with_severity_text(text)
            .with_attributes(Attributes::from_iter([("host.name", "a")]))
    }

    #[test]
    fn record_attributes() {
        let matcher = compile(
            r#"
            match_type: strict
            record_attributes:
              - key: host.name
                value: a
            "#,
        );
        assert!(matcher.matches(&record(SeverityNumber::INFO, "", ""), &Resource::default()));

        let other = LogRecord::new("").with_attributes(Attributes::from_iter([("host.name", "b")]));
        assert!(!matcher.matches(&other, &Resource::default()));
    }

    #[test]
    fn severity_threshold() {
        let matcher = compile(
            r#"
            match_type: strict
            severity_number:
              min: warn
            "#,
        );
        let resource = Resource::default();
        assert!(!matcher.matches(&record(SeverityNumber::INFO4, "", ""), &resource));
        assert!(matcher.matches(&record(SeverityNumber::WARN, "", ""), &resource));
        assert!(matcher.matches(&record(SeverityNumber::FATAL, "", ""), &resource));
        assert!(!matcher.matches(&record(SeverityNumber::UNSPECIFIED, "", ""), &resource));
    }

    #[test]
    fn severity_match_undefined() {
        let matcher = compile(
            r#"
            match_type: strict
            severity_number:
              min: 9
              match_undefined: true
            "#,
        );
        let resource = Resource::default();
        assert!(matcher.matches(&record(SeverityNumber::UNSPECIFIED, "", ""), &resource));
        assert!(!matcher.matches(&record(SeverityNumber::DEBUG, "", ""), &resource));
    }

    #[test]
    fn severity_texts_and_bodies() {
        let matcher = compile(
            r#"
            match_type: regexp
            severity_texts: ["^(WARN|ERROR)$"]
            bodies: ["timeout"]
            "#,
        );
        let resource = Resource::default();
        assert!(matcher.matches(&record(SeverityNumber::WARN, "WARN", "request timeout"), &resource));
        assert!(!matcher.matches(&record(SeverityNumber::WARN, "INFO", "request timeout"), &resource));
        assert!(!matcher.matches(&record(SeverityNumber::WARN, "ERROR", "ok"), &resource));
    }

    #[test]
    fn structured_bodies_match_canonical_string() {
        let matcher = compile(
            r#"
            match_type: regexp
            bodies: ['"status":500']
            "#,
        );
        let body = AttributeValue::Map(Attributes::from_iter([("status", 500_i64)]));
        let record = LogRecord::new("").with_body(body);
        assert!(matcher.matches(&record, &Resource::default()));
    }

    #[test]
    fn resource_attributes_are_all_required() {
        let matcher = compile(
            r#"
            match_type: strict
            resource_attributes:
              - key: env
                value: prod
              - key: region
            "#,
        );
        let record = record(SeverityNumber::INFO, "", "");
        let partial = Resource::new(Attributes::from_iter([("env", "prod")]));
        let full = Resource::new(Attributes::from_iter([("env", "prod"), ("region", "eu")]));
        assert!(!matcher.matches(&record, &partial));
        assert!(matcher.matches(&record, &full));
    }

    #[test]
    fn invalid_configurations() {
        assert_eq!(
            compile_errors("match_type: strict"),
            vec![
                "logs.include: at least one of resource_attributes, record_attributes, severity_texts, \
                 severity_number or bodies must be specified"
            ]
        );

        let errors = compile_errors(
            r#"
            match_type: regexp
            severity_texts: ["("]
            severity_number:
              min: LOUD
            "#,
        );
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("logs.include: invalid pattern '('"));
        assert_eq!(errors[1], "logs.include: 'LOUD' is not a valid severity");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<LogMatchConfig>("match_type: strict\nspan_names: [a]").is_err());
    }
}
