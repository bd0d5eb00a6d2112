//! Metric match properties.
//!
//! Besides the `strict` and `regexp` pattern types shared with the other signals, metric match properties accept
//! `match_type: expr`, where the block is a list of conditions and a metric matches if any of them holds.

use ottl::ConditionSequence;
use serde::Deserialize;
use sieve_data::metrics::Metric;
use sieve_data::{InstrumentationScope, Resource};

use super::pattern_set;
use crate::attributes::{AttributeConfig, AttributesMatcher, Quantifier};
use crate::config::conditions;
use crate::contexts::{MetricContext, MetricFamily};
use crate::error::{ConfigError, EmptyMatchProperties, IncompatibleField};
use crate::filterset::{FilterSet, MatchType, RegexpConfig};

/// How metric match properties are evaluated.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MetricMatchType {
    /// Byte-exact, case-sensitive equality.
    Strict,

    /// Regular expression search.
    Regexp,

    /// Conditions over the metric, any of which must hold.
    Expr,
}

impl MetricMatchType {
    fn as_str(self) -> &'static str {
        match self {
            MetricMatchType::Strict => "strict",
            MetricMatchType::Regexp => "regexp",
            MetricMatchType::Expr => "expr",
        }
    }
}

/// Metric match properties, as written in configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricMatchConfig {
    /// How the block is evaluated.
    pub match_type: MetricMatchType,

    /// Result cache settings for `regexp` patterns.
    #[serde(default)]
    pub regexp: Option<RegexpConfig>,

    /// Metric name patterns, any of which must match.
    #[serde(default)]
    pub metric_names: Vec<String>,

    /// Resource attributes that must all match.
    #[serde(default)]
    pub resource_attributes: Vec<AttributeConfig>,

    /// Conditions for `expr` blocks, any of which must hold.
    #[serde(default)]
    pub expressions: Vec<String>,
}

/// Compiled metric match properties.
#[derive(Debug)]
pub struct MetricMatcher {
    predicates: Predicates,
}

#[derive(Debug)]
enum Predicates {
    Patterns {
        names: Option<FilterSet>,
        resource_attributes: AttributesMatcher,
    },
    Expressions(ConditionSequence<MetricFamily>),
}

impl MetricMatcher {
    pub(crate) fn compile(
        location: &'static str, config: &MetricMatchConfig, errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let predicates = match config.match_type {
            MetricMatchType::Strict => compile_patterns(location, config, MatchType::Strict, errors),
            MetricMatchType::Regexp => compile_patterns(location, config, MatchType::Regexp, errors),
            MetricMatchType::Expr => compile_expressions(location, config, errors),
        }?;
        Some(Self { predicates })
    }

    /// Returns `true` if the metric satisfies every configured predicate.
    pub fn matches(&self, metric: &Metric, scope: &InstrumentationScope, resource: &Resource) -> bool {
        match &self.predicates {
            Predicates::Patterns {
                names,
                resource_attributes,
            } => {
                names.as_ref().is_none_or(|names| names.matches(metric.name()))
                    && resource_attributes.matches(resource.attributes())
            }
            Predicates::Expressions(expressions) => expressions.evaluate(&MetricContext {
                metric,
                scope,
                resource,
            }),
        }
    }
}

fn compile_patterns(
    location: &'static str, config: &MetricMatchConfig, match_type: MatchType, errors: &mut Vec<ConfigError>,
) -> Option<Predicates> {
    let before = errors.len();
    if !config.expressions.is_empty() {
        errors.push(
            IncompatibleField {
                location,
                field: "expressions",
                match_type: config.match_type.as_str(),
            }
            .build(),
        );
    }
    if config.metric_names.is_empty() && config.resource_attributes.is_empty() {
        errors.push(
            EmptyMatchProperties {
                location,
                fields: "metric_names or resource_attributes",
            }
            .build(),
        );
    }

    let names = pattern_set(
        location,
        &config.metric_names,
        match_type,
        config.regexp.as_ref(),
        errors,
    );
    let resource_attributes = AttributesMatcher::compile(
        location,
        &config.resource_attributes,
        match_type,
        Quantifier::All,
        errors,
    );

    if errors.len() != before {
        return None;
    }

    Some(Predicates::Patterns {
        names,
        resource_attributes: resource_attributes?,
    })
}

fn compile_expressions(
    location: &'static str, config: &MetricMatchConfig, errors: &mut Vec<ConfigError>,
) -> Option<Predicates> {
    let before = errors.len();
    let unused = [
        ("metric_names", config.metric_names.is_empty()),
        ("resource_attributes", config.resource_attributes.is_empty()),
        ("regexp", config.regexp.is_none()),
    ];
    for (field, _) in unused.into_iter().filter(|(_, empty)| !empty) {
        errors.push(
            IncompatibleField {
                location,
                field,
                match_type: "expr",
            }
            .build(),
        );
    }
    if config.expressions.is_empty() {
        errors.push(
            EmptyMatchProperties {
                location,
                fields: "expressions",
            }
            .build(),
        );
    }

    let expressions = conditions::<MetricFamily>(location, Some(config.expressions.as_slice()), errors);
    if errors.len() != before {
        return None;
    }
    expressions.map(Predicates::Expressions)
}
