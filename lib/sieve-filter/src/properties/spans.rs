//! Span match properties.

use serde::Deserialize;
use sieve_data::traces::Span;
use sieve_data::{AttributeValue, InstrumentationScope, Resource};
use snafu::ResultExt as _;

use super::pattern_set;
use crate::attributes::{AttributeConfig, AttributesMatcher, Quantifier};
use crate::error::{ConfigError, EmptyMatchProperties, InvalidPattern};
use crate::filterset::{FilterSet, MatchType, Matcher, RegexpConfig};

/// Service name used for resources without a `service.name` attribute.
pub const NIL_SERVICE_NAME: &str = "<nil-service-name>";

const SERVICE_NAME_KEY: &str = "service.name";

/// Span match properties, as written in configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpanMatchConfig {
    /// How patterns are matched.
    pub match_type: MatchType,

    /// Result cache settings for `regexp` patterns.
    #[serde(default)]
    pub regexp: Option<RegexpConfig>,

    /// Service name patterns, matched against the resource's `service.name`.
    #[serde(default)]
    pub services: Vec<String>,

    /// Span name patterns.
    #[serde(default)]
    pub span_names: Vec<String>,

    /// Span kind patterns, matched against names such as `SPAN_KIND_SERVER`.
    #[serde(default)]
    pub span_kinds: Vec<String>,

    /// Span attributes, any of which must match.
    #[serde(default)]
    pub attributes: Vec<AttributeConfig>,

    /// Resource attributes that must all match.
    #[serde(default)]
    pub resources: Vec<AttributeConfig>,

    /// Instrumentation libraries, any of which must match.
    #[serde(default)]
    pub libraries: Vec<LibraryConfig>,
}

impl SpanMatchConfig {
    fn is_empty(&self) -> bool {
        self.services.is_empty()
            && self.span_names.is_empty()
            && self.span_kinds.is_empty()
            && self.attributes.is_empty()
            && self.resources.is_empty()
            && self.libraries.is_empty()
    }
}

/// An instrumentation library predicate.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LibraryConfig {
    /// Library name pattern.
    pub name: String,

    /// Optional library version pattern.
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug)]
struct LibraryMatcher {
    name: Matcher,
    version: Option<Matcher>,
}

impl LibraryMatcher {
    fn compile(
        location: &'static str, config: &LibraryConfig, match_type: MatchType, errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let mut compile = |pattern: &str| {
            Matcher::compile(pattern, match_type)
                .context(InvalidPattern { location, pattern })
                .map_err(|e| errors.push(e))
                .ok()
        };

        let name = compile(&config.name);
        let version = match &config.version {
            Some(version) => Some(compile(version)?),
            None => None,
        };

        Some(Self { name: name?, version })
    }

    fn matches(&self, scope: &InstrumentationScope) -> bool {
        self.name.test(scope.name()) && self.version.as_ref().is_none_or(|v| v.test(scope.version()))
    }
}

/// Compiled span match properties.
#[derive(Debug)]
pub struct SpanMatcher {
    services: Option<FilterSet>,
    span_names: Option<FilterSet>,
    span_kinds: Option<FilterSet>,
    libraries: Vec<LibraryMatcher>,
    resources: AttributesMatcher,
    attributes: AttributesMatcher,
}

impl SpanMatcher {
    pub(crate) fn compile(
        location: &'static str, config: &SpanMatchConfig, errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let before = errors.len();
        if config.is_empty() {
            errors.push(
                EmptyMatchProperties {
                    location,
                    fields: "services, span_names, span_kinds, attributes, resources or libraries",
                }
                .build(),
            );
        }

        let match_type = config.match_type;
        let regexp = config.regexp.as_ref();
        let services = pattern_set(location, &config.services, match_type, regexp, errors);
        let span_names = pattern_set(location, &config.span_names, match_type, regexp, errors);
        let span_kinds = pattern_set(location, &config.span_kinds, match_type, regexp, errors);
        let libraries = config
            .libraries
            .iter()
            .filter_map(|library| LibraryMatcher::compile(location, library, match_type, errors))
            .collect();
        let resources = AttributesMatcher::compile(location, &config.resources, match_type, Quantifier::All, errors);
        let attributes =
            AttributesMatcher::compile(location, &config.attributes, match_type, Quantifier::Any, errors);

        if errors.len() != before {
            return None;
        }

        Some(Self {
            services,
            span_names,
            span_kinds,
            libraries,
            resources: resources?,
            attributes: attributes?,
        })
    }

    /// Returns `true` if the span satisfies every configured predicate.
    pub fn matches(&self, span: &Span, resource: &Resource, scope: &InstrumentationScope) -> bool {
        if let Some(services) = &self.services {
            let service = match resource.attributes().get(SERVICE_NAME_KEY) {
                Some(AttributeValue::String(name)) => name.as_str(),
                _ => NIL_SERVICE_NAME,
            };
            if !services.matches(service) {
                return false;
            }
        }
        if let Some(span_names) = &self.span_names {
            if !span_names.matches(span.name()) {
                return false;
            }
        }
        if let Some(span_kinds) = &self.span_kinds {
            if !span_kinds.matches(span.kind().as_str()) {
                return false;
            }
        }
        if !self.libraries.is_empty() && !self.libraries.iter().any(|library| library.matches(scope)) {
            return false;
        }
        self.resources.matches(resource.attributes()) && self.attributes.matches(span.attributes())
    }
}
