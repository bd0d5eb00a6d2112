//! String matchers.
//!
//! A [`Matcher`] tests a candidate string against a single pattern, either for exact equality or with a regular
//! expression. A [`FilterSet`] groups the patterns of one configuration field and matches if any of them does.

use std::fmt;

use quick_cache::sync::Cache;
use regex::Regex;
use serde::Deserialize;
use snafu::ResultExt as _;

use crate::error::{ConfigError, InvalidPattern};

const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// How patterns are matched against candidate strings.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// Byte-exact, case-sensitive equality.
    Strict,

    /// Regular expression search. The pattern may match anywhere in the candidate unless it is anchored.
    Regexp,
}

/// Result cache settings for regular expression filter sets.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegexpConfig {
    /// Whether match results are cached per candidate string.
    #[serde(default, rename = "cacheenabled")]
    pub cache_enabled: bool,

    /// Maximum number of cached results. Zero selects the default.
    #[serde(default, rename = "cachemaxnumentries")]
    pub cache_max_num_entries: usize,
}

/// A compiled pattern.
#[derive(Clone, Debug)]
pub enum Matcher {
    /// Matches candidates equal to the pattern.
    Strict(String),

    /// Matches candidates containing a match for the expression.
    Regexp(Regex),
}

impl Matcher {
    /// Compiles `pattern` for the given match type.
    ///
    /// # Errors
    ///
    /// If the match type is [`MatchType::Regexp`] and the pattern is not a valid regular expression, an error is
    /// returned.
    pub fn compile(pattern: &str, match_type: MatchType) -> Result<Self, regex::Error> {
        match match_type {
            MatchType::Strict => Ok(Matcher::Strict(pattern.to_string())),
            MatchType::Regexp => Regex::new(pattern).map(Matcher::Regexp),
        }
    }

    /// Returns `true` if `candidate` matches.
    pub fn test(&self, candidate: &str) -> bool {
        match self {
            Matcher::Strict(pattern) => pattern == candidate,
            Matcher::Regexp(regex) => regex.is_match(candidate),
        }
    }

    /// Returns the pattern as written.
    pub fn pattern(&self) -> &str {
        match self {
            Matcher::Strict(pattern) => pattern,
            Matcher::Regexp(regex) => regex.as_str(),
        }
    }
}

/// A set of patterns sharing one match type.
///
/// A candidate matches the set if it matches any pattern. Regular expression sets can cache results per candidate,
/// which pays off when the same strings (metric names, service names) are seen in every batch.
pub struct FilterSet {
    matchers: Vec<Matcher>,
    cache: Option<Cache<String, bool>>,
}

impl FilterSet {
    /// Compiles every pattern.
    ///
    /// Each invalid pattern is appended to `errors`, and `None` is returned if there were any.
    pub(crate) fn compile<S: AsRef<str>>(
        location: &'static str, patterns: &[S], match_type: MatchType, regexp: Option<&RegexpConfig>,
        errors: &mut Vec<ConfigError>,
    ) -> Option<Self> {
        let mut matchers = Vec::with_capacity(patterns.len());
        let mut failed = false;
        for pattern in patterns {
            let pattern = pattern.as_ref();
            match Matcher::compile(pattern, match_type).context(InvalidPattern { location, pattern }) {
                Ok(matcher) => matchers.push(matcher),
                Err(e) => {
                    failed = true;
                    errors.push(e);
                }
            }
        }

        if failed {
            return None;
        }

        let cache = match (match_type, regexp) {
            (MatchType::Regexp, Some(config)) if config.cache_enabled => {
                let capacity = match config.cache_max_num_entries {
                    0 => DEFAULT_CACHE_MAX_ENTRIES,
                    n => n,
                };
                Some(Cache::new(capacity))
            }
            _ => None,
        };

        Some(Self { matchers, cache })
    }

    /// Returns `true` if `candidate` matches any pattern.
    pub fn matches(&self, candidate: &str) -> bool {
        let Some(cache) = &self.cache else {
            return self.test(candidate);
        };

        if let Some(matched) = cache.get(candidate) {
            return matched;
        }

        let matched = self.test(candidate);
        cache.insert(candidate.to_string(), matched);
        matched
    }

    /// Returns `true` if the set has no patterns.
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    fn test(&self, candidate: &str) -> bool {
        self.matchers.iter().any(|matcher| matcher.test(candidate))
    }
}

impl fmt::Debug for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSet")
            .field("patterns", &self.matchers.iter().map(Matcher::pattern).collect::<Vec<_>>())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
