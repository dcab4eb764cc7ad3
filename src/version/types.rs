//! Common types shared by the version layer

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::version::artifact_version::ArtifactVersion;
use crate::version::bound::BoundedVersion;

/// Either a concrete version or a segment-bounded sentinel.
///
/// Comparators dispatch on the variant explicitly; a sentinel is never stored in a version set,
/// it only appears as a restriction bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Concrete(ArtifactVersion),
    Bounded(BoundedVersion),
}

impl Version {
    pub fn as_str(&self) -> &str {
        self.comparable_form().as_str()
    }

    /// The concrete version this value compares as (the padded form for a sentinel)
    pub fn comparable_form(&self) -> &ArtifactVersion {
        match self {
            Version::Concrete(version) => version,
            Version::Bounded(bound) => bound.comparable(),
        }
    }
}

impl From<ArtifactVersion> for Version {
    fn from(version: ArtifactVersion) -> Self {
        Version::Concrete(version)
    }
}

impl From<&ArtifactVersion> for Version {
    fn from(version: &ArtifactVersion) -> Self {
        Version::Concrete(version.clone())
    }
}

impl From<BoundedVersion> for Version {
    fn from(bound: BoundedVersion) -> Self {
        Version::Bounded(bound)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `groupId:artifactId[:version]` of a dependency or plugin.
///
/// Ordered by group id, artifact id, then version, which is the stable order used for every
/// aggregated lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.map(str::to_string),
        }
    }

    /// `groupId:artifactId`, the key used for rule lookups and reactor matching
    pub fn versionless_key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    pub fn same_artifact(&self, other: &Coordinate) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    pub fn with_version(&self, version: Option<&str>) -> Self {
        Self::new(&self.group_id, &self.artifact_id, version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, version),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}
