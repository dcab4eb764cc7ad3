//! Rule-set descriptor model

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::comparator::DEFAULT_COMPARISON_METHOD;

/// Matches versions by string equality
pub const TYPE_EXACT: &str = "exact";

/// Matches versions by a regular expression covering the whole version
pub const TYPE_REGEX: &str = "regex";

/// A version to leave out of update candidates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoreVersion {
    pub version: String,
    #[serde(rename = "type", default = "default_ignore_type")]
    pub kind: String,
}

fn default_ignore_type() -> String {
    TYPE_EXACT.to_string()
}

impl IgnoreVersion {
    pub fn exact(version: &str) -> Self {
        Self {
            version: version.to_string(),
            kind: TYPE_EXACT.to_string(),
        }
    }

    pub fn regex(pattern: &str) -> Self {
        Self {
            version: pattern.to_string(),
            kind: TYPE_REGEX.to_string(),
        }
    }
}

impl fmt::Display for IgnoreVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version, self.kind)
    }
}

/// Comparison method and ignored versions for artifacts matching the patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub group_id: String,
    #[serde(default = "default_artifact_id")]
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_versions: Vec<IgnoreVersion>,
}

fn default_artifact_id() -> String {
    "*".to_string()
}

impl Rule {
    pub fn new(group_id: &str, artifact_id: &str, comparison_method: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            comparison_method: comparison_method.map(str::to_string),
            ignore_versions: Vec::new(),
        }
    }

    pub fn with_ignore_versions(mut self, ignore_versions: Vec<IgnoreVersion>) -> Self {
        self.ignore_versions = ignore_versions;
        self
    }
}

/// Ordered rules plus the global defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleSet {
    pub comparison_method: String,
    pub ignore_versions: Vec<IgnoreVersion>,
    pub rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            comparison_method: DEFAULT_COMPARISON_METHOD.to_string(),
            ignore_versions: Vec::new(),
            rules: Vec::new(),
        }
    }
}
