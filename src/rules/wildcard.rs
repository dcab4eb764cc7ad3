//! Shell-style wildcard patterns (`*` and `?`)

use regex::Regex;

/// Specificity score of a pattern; lower is more specific.
///
/// Each `*` costs 1000 and each `?` costs 1, so a literal pattern scores 0.
pub fn wildcard_score(pattern: &str) -> u32 {
    pattern
        .chars()
        .map(|c| match c {
            '*' => 1000,
            '?' => 1,
            _ => 0,
        })
        .sum()
}

/// Converts a wildcard pattern to an anchored regex.
///
/// With `exact` the pattern must cover the whole value, otherwise it only has to match a
/// prefix of it.
pub fn wildcard_to_regex(pattern: &str, exact: bool) -> String {
    let mut regex = String::from("^");
    let mut literal = String::new();
    for c in pattern.chars() {
        match c {
            '*' | '?' => {
                regex.push_str(&regex::escape(&literal));
                literal.clear();
                regex.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    regex.push_str(&regex::escape(&literal));
    if !exact {
        regex.push_str(".*");
    }
    regex.push('$');
    regex
}

/// A wildcard pattern compiled for both whole-value and prefix matching
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    score: u32,
    exact: Option<Regex>,
    prefix: Option<Regex>,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Self {
        Self {
            score: wildcard_score(pattern),
            exact: Regex::new(&wildcard_to_regex(pattern, true)).ok(),
            prefix: Regex::new(&wildcard_to_regex(pattern, false)).ok(),
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns true if `value` matches (whole value with `exact`, prefix otherwise)
    pub fn matches(&self, value: &str, exact: bool) -> bool {
        let regex = if exact { &self.exact } else { &self.prefix };
        regex.as_ref().is_some_and(|regex| regex.is_match(value))
    }
}
