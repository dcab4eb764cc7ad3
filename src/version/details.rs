//! Queries shared by every version set
//!
//! A version set only has to supply its sorted versions, its comparator and the current
//! version; all range, restriction and segment queries are derived from those three.

use std::collections::BTreeMap;

use tracing::debug;

use crate::version::artifact_version::ArtifactVersion;
use crate::version::bound::BoundedVersion;
use crate::version::comparator::VersionComparator;
use crate::version::error::InvalidSegmentError;
use crate::version::range::{Restriction, VersionRange};
use crate::version::segment::Segment;
use crate::version::types::Version;

/// Oldest and newest update found at one segment granularity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentUpdates {
    pub oldest: Option<ArtifactVersion>,
    pub newest: Option<ArtifactVersion>,
}

pub trait VersionDetails {
    /// Ordering used for every query of this set
    fn comparator(&self) -> VersionComparator;

    /// Known versions in ascending order, without snapshots unless `include_snapshots`
    fn versions(&self, include_snapshots: bool) -> Vec<ArtifactVersion>;

    /// Reference version updates are computed against
    fn current_version(&self) -> Option<&ArtifactVersion>;

    /// Returns true if a version with exactly this string form is known
    fn contains_version(&self, version: &str) -> bool {
        self.versions(true).iter().any(|v| v.as_str() == version)
    }

    /// Versions inside `range` (if any) and `restriction`, ascending
    fn versions_in(
        &self,
        range: Option<&VersionRange>,
        restriction: &Restriction,
        include_snapshots: bool,
    ) -> Vec<ArtifactVersion> {
        let comparator = self.comparator();
        self.versions(include_snapshots)
            .into_iter()
            .filter(|candidate| range.is_none_or(|r| r.contains_version(comparator, candidate)))
            .filter(|candidate| restriction.contains(comparator, candidate))
            .collect()
    }

    fn newest_version_in(
        &self,
        range: Option<&VersionRange>,
        restriction: &Restriction,
        include_snapshots: bool,
    ) -> Option<ArtifactVersion> {
        self.versions_in(range, restriction, include_snapshots).pop()
    }

    fn oldest_version_in(
        &self,
        range: Option<&VersionRange>,
        restriction: &Restriction,
        include_snapshots: bool,
    ) -> Option<ArtifactVersion> {
        self.versions_in(range, restriction, include_snapshots)
            .into_iter()
            .next()
    }

    /// Every version newer than the current one; all versions without a current version
    fn newer_versions(&self, include_snapshots: bool) -> Vec<ArtifactVersion> {
        let restriction = match self.current_version() {
            Some(current) => Restriction::new(Some(Version::from(current)), false, None, false),
            None => Restriction::everything(),
        };
        self.versions_in(None, &restriction, include_snapshots)
    }

    /// Checks that `segment` is meaningful for `version` under this set's comparator
    fn check_segment(
        &self,
        version: &ArtifactVersion,
        segment: Segment,
    ) -> Result<(), InvalidSegmentError> {
        let segment_count = self.comparator().segment_count(version);
        if segment.index() >= segment_count {
            return Err(InvalidSegmentError {
                version: version.to_string(),
                segment,
                segment_count,
            });
        }
        Ok(())
    }

    /// Restriction for updates newer than the current version where `scope` is the most major
    /// segment allowed to change; `None` or `Major` leaves the upper side open.
    ///
    /// # Errors
    /// Returns `InvalidSegmentError` if the segments held in place do not exist in the current
    /// version.
    fn update_restriction(&self, scope: Option<Segment>) -> Result<Restriction, InvalidSegmentError> {
        let Some(current) = self.current_version() else {
            return Ok(Restriction::everything());
        };
        let upper = match scope.and_then(|s| s.major_to()) {
            Some(held) => {
                self.check_segment(current, held)?;
                Some(Version::from(BoundedVersion::from_version(current, Some(held))))
            }
            None => None,
        };
        Ok(Restriction::new(Some(Version::from(current)), false, upper, false))
    }

    /// Restriction for updates changing exactly `segment`: everything more major stays equal to
    /// the current version and `segment` itself moves forward.
    fn segment_restriction(&self, segment: Segment) -> Result<Restriction, InvalidSegmentError> {
        let Some(current) = self.current_version() else {
            return Ok(Restriction::everything());
        };
        let lower = if segment == Segment::Subincremental {
            Version::from(current)
        } else {
            self.check_segment(current, segment)?;
            Version::from(BoundedVersion::from_version(current, Some(segment)))
        };
        let upper = match segment.major_to() {
            Some(held) => {
                self.check_segment(current, held)?;
                Some(Version::from(BoundedVersion::from_version(current, Some(held))))
            }
            None => None,
        };
        Ok(Restriction::new(Some(lower), false, upper, false))
    }

    fn newest_update(
        &self,
        scope: Option<Segment>,
        include_snapshots: bool,
    ) -> Result<Option<ArtifactVersion>, InvalidSegmentError> {
        let restriction = self.update_restriction(scope)?;
        Ok(self.newest_version_in(None, &restriction, include_snapshots))
    }

    fn oldest_update(
        &self,
        scope: Option<Segment>,
        include_snapshots: bool,
    ) -> Result<Option<ArtifactVersion>, InvalidSegmentError> {
        let restriction = self.update_restriction(scope)?;
        Ok(self.oldest_version_in(None, &restriction, include_snapshots))
    }

    fn all_updates(
        &self,
        scope: Option<Segment>,
        include_snapshots: bool,
    ) -> Result<Vec<ArtifactVersion>, InvalidSegmentError> {
        let restriction = self.update_restriction(scope)?;
        Ok(self.versions_in(None, &restriction, include_snapshots))
    }

    /// Oldest and newest update for every segment granularity.
    ///
    /// Segments that are not meaningful for the current version report no updates.
    fn updates_by_segment(&self, include_snapshots: bool) -> BTreeMap<Segment, SegmentUpdates> {
        Segment::ALL
            .iter()
            .map(|&segment| {
                let updates = match self.segment_restriction(segment) {
                    Ok(restriction) => {
                        let candidates = self.versions_in(None, &restriction, include_snapshots);
                        SegmentUpdates {
                            oldest: candidates.first().cloned(),
                            newest: candidates.last().cloned(),
                        }
                    }
                    Err(e) => {
                        debug!("No {} updates: {}", segment, e);
                        SegmentUpdates::default()
                    }
                };
                (segment, updates)
            })
            .collect()
    }
}
