//! Version ordering strategies
//!
//! The set of strategies is closed: each comparison method name maps to one
//! [`VersionComparator`] variant and every variant answers the same two questions, how two
//! versions order and how many segments of a version are meaningful.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::version::artifact_version::{ArtifactVersion, is_snapshot, strip_snapshot};
use crate::version::comparators::{maven, mercury, numeric};
use crate::version::types::Version;

/// Name of the default comparison method
pub const DEFAULT_COMPARISON_METHOD: &str = "maven";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VersionComparator {
    /// Maven `ComparableVersion` rules, i.e. `1.3.34 > 1.3.9` but `1.3-SNAPSHOT < 1.3`
    #[default]
    Maven,
    /// Dotted numeric components, qualifiers only break ties
    Numeric,
    /// Flat Mercury rules: hyphens do not open nested lists
    Mercury,
}

impl VersionComparator {
    /// Looks up a comparator by comparison method name; unknown names fall back to Maven
    pub fn for_method(method: &str) -> Self {
        match method {
            "numeric" => VersionComparator::Numeric,
            "mercury" => VersionComparator::Mercury,
            "maven" => VersionComparator::Maven,
            other => {
                debug!("Unknown comparison method '{}', using maven", other);
                VersionComparator::Maven
            }
        }
    }

    pub fn method(&self) -> &'static str {
        match self {
            VersionComparator::Maven => "maven",
            VersionComparator::Numeric => "numeric",
            VersionComparator::Mercury => "mercury",
        }
    }

    /// Total order over concrete versions and bound sentinels
    pub fn compare(&self, a: &Version, b: &Version) -> Ordering {
        match self {
            VersionComparator::Maven => maven::compare(a, b),
            VersionComparator::Numeric => {
                numeric::compare(a.comparable_form().as_str(), b.comparable_form().as_str())
            }
            VersionComparator::Mercury => {
                mercury::compare(a.comparable_form().as_str(), b.comparable_form().as_str())
            }
        }
    }

    /// Shorthand for comparing two concrete versions
    pub fn compare_versions(&self, a: &ArtifactVersion, b: &ArtifactVersion) -> Ordering {
        self.compare(&Version::from(a), &Version::from(b))
    }

    /// Number of meaningful segments; snapshot suffixes are stripped before counting
    pub fn segment_count(&self, version: &ArtifactVersion) -> usize {
        if is_snapshot(version.as_str()) {
            let stripped = ArtifactVersion::new(strip_snapshot(version.as_str()));
            return self.inner_segment_count(&stripped);
        }
        self.inner_segment_count(version)
    }

    fn inner_segment_count(&self, version: &ArtifactVersion) -> usize {
        match self {
            VersionComparator::Maven => maven::segment_count(version),
            VersionComparator::Numeric => numeric::segment_count(version.as_str()),
            VersionComparator::Mercury => mercury::segment_count(version.as_str()),
        }
    }
}

impl fmt::Display for VersionComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method())
    }
}
