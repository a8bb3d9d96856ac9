//! Exact-or-pattern predicates used to select observations and detectors.
//!
//! Pattern variants use a compiled [`Regex`] anchored at the start of the
//! candidate string only: `"sci"` matches `"science_1"` but not
//! `"my_science"`. Add a trailing `$` to require a full match.

use std::fmt;

use regex::Regex;

use crate::value::Value;

/// Returns `true` if `re` matches a prefix of `s`.
///
/// The leftmost match starts at 0 whenever any match does, so checking
/// the first match is sufficient.
fn matches_at_start(re: &Regex, s: &str) -> bool {
    re.find(s).is_some_and(|m| m.start() == 0)
}

/// Predicate over strings such as observation names or detector ids.
#[derive(Clone)]
pub enum Matcher {
    /// The candidate must equal this string.
    Exact(String),
    /// The candidate must equal one of these strings.
    AnyOf(Vec<String>),
    /// The candidate must match this pattern at its start.
    Pattern(Regex),
}

impl Matcher {
    /// Compile `pattern` into a [`Matcher::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Returns `true` if `candidate` satisfies this predicate.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(s) => s == candidate,
            Self::AnyOf(items) => items.iter().any(|s| s == candidate),
            Self::Pattern(re) => matches_at_start(re, candidate),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(s) => f.debug_tuple("Exact").field(s).finish(),
            Self::AnyOf(items) => f.debug_tuple("AnyOf").field(items).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Self::Exact(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Self::Exact(s)
    }
}

impl From<Regex> for Matcher {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

/// Predicate over a keyed [`Value`].
#[derive(Clone)]
pub enum ValueMatch {
    /// The value must equal this one.
    Exact(Value),
    /// The value must be a string matching this pattern at its start.
    /// Non-string values never match.
    Pattern(Regex),
}

impl ValueMatch {
    /// Compile `pattern` into a [`ValueMatch::Pattern`].
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::Pattern(Regex::new(pattern)?))
    }

    /// Returns `true` if `value` satisfies this predicate.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Exact(v) => v == value,
            Self::Pattern(re) => value.as_str().is_some_and(|s| matches_at_start(re, s)),
        }
    }
}

impl fmt::Debug for ValueMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(v) => f.debug_tuple("Exact").field(v).finish(),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

impl From<Value> for ValueMatch {
    fn from(v: Value) -> Self {
        Self::Exact(v)
    }
}

macro_rules! value_match_from {
    ( $( $t: ty ),* ) => {$(
        impl From<$t> for ValueMatch {
            fn from(v: $t) -> Self {
                Self::Exact(Value::from(v))
            }
        }
    )*}
}

value_match_from!(bool, i64, i32, f64, &str, String);

impl From<Regex> for ValueMatch {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_requires_equality() {
        let m = Matcher::from("scan_01");
        assert!(m.matches("scan_01"));
        assert!(!m.matches("scan_010"));
    }

    #[test]
    fn pattern_is_anchored_at_start_only() {
        let m = Matcher::pattern("scan_0").unwrap();
        assert!(m.matches("scan_01"));
        assert!(m.matches("scan_0"));
        assert!(!m.matches("old_scan_01"));

        let full = Matcher::pattern("scan_0$").unwrap();
        assert!(!full.matches("scan_01"));
    }

    #[test]
    fn any_of_checks_membership() {
        let m = Matcher::AnyOf(vec!["d0".into(), "d2".into()]);
        assert!(m.matches("d2"));
        assert!(!m.matches("d1"));
    }

    #[test]
    fn value_pattern_only_matches_strings() {
        let m = ValueMatch::pattern("1").unwrap();
        assert!(m.matches(&Value::from("10")));
        assert!(!m.matches(&Value::from(10i64)));
    }

    #[test]
    fn value_exact_compares_variants() {
        let m = ValueMatch::from(3i64);
        assert!(m.matches(&Value::Int(3)));
        assert!(!m.matches(&Value::from(3.0)));
    }
}
