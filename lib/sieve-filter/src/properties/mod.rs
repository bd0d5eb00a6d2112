//! Include/exclude match properties.
//!
//! Match properties select items by static predicates: name patterns, attribute matchers, severities, and so on. Each
//! signal has its own set of predicates, but they are all combined the same way by [`IncludeExclude`].

use crate::error::ConfigError;
use crate::filterset::{FilterSet, MatchType, RegexpConfig};

pub mod logs;
pub mod metrics;
pub mod spans;

/// A pair of optional include and exclude matchers.
///
/// An item is kept when it matches `include` (or no `include` is configured) and does not match `exclude`.
#[derive(Debug)]
pub struct IncludeExclude<P> {
    include: Option<P>,
    exclude: Option<P>,
}

impl<P> IncludeExclude<P> {
    /// Creates a new `IncludeExclude`.
    pub fn new(include: Option<P>, exclude: Option<P>) -> Self {
        Self { include, exclude }
    }

    /// Returns `true` if the item is kept, where `matches` tests the item against one set of match properties.
    pub fn keep<F>(&self, matches: F) -> bool
    where
        F: Fn(&P) -> bool,
    {
        if let Some(include) = &self.include {
            if !matches(include) {
                return false;
            }
        }

        match &self.exclude {
            Some(exclude) => !matches(exclude),
            None => true,
        }
    }
}

/// Compiles a pattern list, returning `None` when it is empty or invalid.
///
/// Invalid patterns are appended to `errors`.
fn pattern_set(
    location: &'static str, patterns: &[String], match_type: MatchType, regexp: Option<&RegexpConfig>,
    errors: &mut Vec<ConfigError>,
) -> Option<FilterSet> {
    if patterns.is_empty() {
        return None;
    }
    FilterSet::compile(location, patterns, match_type, regexp, errors)
}
