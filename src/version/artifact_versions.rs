//! Known versions of a single artifact

use std::collections::HashSet;

use crate::version::artifact_version::ArtifactVersion;
use crate::version::comparator::VersionComparator;
use crate::version::details::VersionDetails;
use crate::version::range::is_range_spec;
use crate::version::types::Coordinate;

/// Immutable snapshot of the versions available for one coordinate, deduplicated by string
/// form and sorted ascending by the coordinate's comparator.
#[derive(Debug, Clone)]
pub struct ArtifactVersions {
    coordinate: Coordinate,
    comparator: VersionComparator,
    versions: Vec<ArtifactVersion>,
    current: Option<ArtifactVersion>,
}

impl ArtifactVersions {
    /// The coordinate's version becomes the current version unless it is a range
    pub fn new(
        coordinate: Coordinate,
        versions: impl IntoIterator<Item = ArtifactVersion>,
        comparator: VersionComparator,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut versions: Vec<ArtifactVersion> = versions
            .into_iter()
            .filter(|v| seen.insert(v.as_str().to_string()))
            .collect();
        versions.sort_by(|a, b| comparator.compare_versions(a, b));

        let current = coordinate
            .version
            .as_deref()
            .filter(|version| !is_range_spec(version))
            .map(ArtifactVersion::new);
        Self {
            coordinate,
            comparator,
            versions,
            current,
        }
    }

    /// Same versions compared against another current version
    pub fn with_current_version(mut self, version: Option<&str>) -> Self {
        self.current = version.map(ArtifactVersion::new);
        self.coordinate = self.coordinate.with_version(version);
        self
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }
}

impl VersionDetails for ArtifactVersions {
    fn comparator(&self) -> VersionComparator {
        self.comparator
    }

    fn versions(&self, include_snapshots: bool) -> Vec<ArtifactVersion> {
        self.versions
            .iter()
            .filter(|v| include_snapshots || !v.is_snapshot())
            .cloned()
            .collect()
    }

    fn current_version(&self) -> Option<&ArtifactVersion> {
        self.current.as_ref()
    }
}
