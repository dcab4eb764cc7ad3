//! Ignore-version entries

use regex::Regex;
use tracing::warn;

use crate::rules::model::{IgnoreVersion, TYPE_EXACT, TYPE_REGEX};

pub const VALID_TYPES: [&str; 2] = [TYPE_EXACT, TYPE_REGEX];

pub fn is_valid_type(ignore: &IgnoreVersion) -> bool {
    VALID_TYPES.contains(&ignore.kind.as_str())
}

/// Ignore entries compiled once and matched against many candidate versions
#[derive(Debug, Clone, Default)]
pub struct IgnoreFilter {
    exact: Vec<String>,
    patterns: Vec<Regex>,
}

impl IgnoreFilter {
    /// Compiles `ignored`; invalid patterns and entries of unknown type never match
    pub fn new(ignored: &[IgnoreVersion]) -> Self {
        let mut filter = Self::default();
        for ignore in ignored {
            match ignore.kind.as_str() {
                TYPE_EXACT => filter.exact.push(ignore.version.clone()),
                TYPE_REGEX => match Regex::new(&format!("^(?:{})$", ignore.version)) {
                    Ok(regex) => filter.patterns.push(regex),
                    Err(e) => warn!("Invalid ignoreVersion pattern '{}': {}", ignore.version, e),
                },
                _ => {}
            }
        }
        filter
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.patterns.is_empty()
    }

    /// Returns true if any entry matches `version`
    pub fn is_ignored(&self, version: &str) -> bool {
        self.exact.iter().any(|exact| exact == version)
            || self.patterns.iter().any(|regex| regex.is_match(version))
    }
}
