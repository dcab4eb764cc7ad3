//! Versions of a build property shared by several artifacts
//!
//! A property such as `${lib.version}` may control the version of several dependencies or
//! plugins at once. Its candidate versions are the ones every associated artifact offers, and
//! the newest admissible one may come from the reactor instead of a remote repository.

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::artifact_version::ArtifactVersion;
use crate::version::bound::BoundedVersion;
use crate::version::comparator::VersionComparator;
use crate::version::details::VersionDetails;
use crate::version::error::{InvalidSegmentError, VersionsError};
use crate::version::range::{Restriction, VersionRange};
use crate::version::segment::Segment;
use crate::version::types::{Coordinate, Version};

/// Update policy of one build property
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    /// Version range the property must stay within
    pub version: Option<String>,
    /// Current value, read from the build descriptor
    pub value: Option<String>,
    pub search_reactor: bool,
    pub prefer_reactor: bool,
    pub ban_snapshots: bool,
    /// Artifacts explicitly controlled by the property
    pub dependencies: Vec<Coordinate>,
    /// Whether associations discovered from `${name}` references are kept
    pub auto_link_dependencies: bool,
}

impl Property {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Default for Property {
    fn default() -> Self {
        Self {
            name: String::new(),
            version: None,
            value: None,
            search_reactor: true,
            prefer_reactor: true,
            ban_snapshots: false,
            dependencies: Vec::new(),
            auto_link_dependencies: true,
        }
    }
}

/// Link between a property and an artifact whose version it controls
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactAssociation {
    pub coordinate: Coordinate,
    /// Plugin versions are looked up in plugin repositories
    pub uses_plugin_repositories: bool,
}

impl ArtifactAssociation {
    pub fn new(coordinate: Coordinate, uses_plugin_repositories: bool) -> Self {
        Self {
            coordinate,
            uses_plugin_repositories,
        }
    }
}

impl fmt::Display for ArtifactAssociation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.coordinate)?;
        if self.uses_plugin_repositories {
            f.write_str(" (plugin)")?;
        }
        Ok(())
    }
}

/// Collects the associations of one property before its versions are resolved
#[derive(Debug, Clone)]
pub struct PropertyVersionsBuilder {
    name: String,
    profile_id: Option<String>,
    associations: BTreeSet<ArtifactAssociation>,
}

impl PropertyVersionsBuilder {
    pub fn new(profile_id: Option<&str>, name: &str) -> Self {
        Self {
            name: name.to_string(),
            profile_id: profile_id.map(str::to_string),
            associations: BTreeSet::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    pub fn add_association(&mut self, coordinate: Coordinate, uses_plugin_repositories: bool) {
        self.associations
            .insert(ArtifactAssociation::new(coordinate, uses_plugin_repositories));
    }

    pub fn clear_associations(&mut self) {
        self.associations.clear();
    }

    pub fn is_associated(&self) -> bool {
        !self.associations.is_empty()
    }

    pub fn associations(&self) -> &BTreeSet<ArtifactAssociation> {
        &self.associations
    }

    /// Narrowest range implied by the declared versions of the associated artifacts.
    ///
    /// Only declarations that are real ranges (not soft requirements) contribute; `None` if no
    /// association declares one.
    pub fn inferred_version_range(&self) -> Option<String> {
        let mut lower: Option<(ArtifactVersion, bool)> = None;
        let mut upper: Option<(ArtifactVersion, bool)> = None;
        let mut constrained = false;

        for association in &self.associations {
            let Some(declared) = association.coordinate.version.as_deref() else {
                continue;
            };
            let Ok(range) = VersionRange::parse(declared) else {
                debug!("Ignoring unparsable version '{}' of {}", declared, association);
                continue;
            };
            if !range.has_restrictions() {
                continue;
            }
            let [restriction] = range.restrictions() else {
                debug!("Ignoring multi-set range '{}' of {}", declared, association);
                continue;
            };
            constrained = true;

            if let Some(Version::Concrete(candidate)) = restriction.lower() {
                let tighter = match &lower {
                    None => true,
                    Some((current, inclusive)) => match candidate.comparable().cmp(current.comparable()) {
                        std::cmp::Ordering::Greater => true,
                        std::cmp::Ordering::Equal => *inclusive && !restriction.lower_inclusive(),
                        std::cmp::Ordering::Less => false,
                    },
                };
                if tighter {
                    lower = Some((candidate.clone(), restriction.lower_inclusive()));
                }
            }
            if let Some(Version::Concrete(candidate)) = restriction.upper() {
                let tighter = match &upper {
                    None => true,
                    Some((current, inclusive)) => match candidate.comparable().cmp(current.comparable()) {
                        std::cmp::Ordering::Less => true,
                        std::cmp::Ordering::Equal => *inclusive && !restriction.upper_inclusive(),
                        std::cmp::Ordering::Greater => false,
                    },
                };
                if tighter {
                    upper = Some((candidate.clone(), restriction.upper_inclusive()));
                }
            }
        }

        if !constrained {
            return None;
        }
        let (open, lower) = match lower {
            Some((version, true)) => ('[', version.to_string()),
            Some((version, false)) => ('(', version.to_string()),
            None => ('(', String::new()),
        };
        let (close, upper) = match upper {
            Some((version, true)) => (']', version.to_string()),
            Some((version, false)) => (')', version.to_string()),
            None => (')', String::new()),
        };
        Some(format!("{open}{lower},{upper}{close}"))
    }

    /// Finishes the builder with versions already intersected across the associations
    pub fn build(
        self,
        versions: impl IntoIterator<Item = ArtifactVersion>,
        comparator: VersionComparator,
    ) -> PropertyVersions {
        let mut versions: Vec<ArtifactVersion> = versions.into_iter().collect();
        versions.sort_by(|a, b| comparator.compare_versions(a, b));
        versions.dedup();

        PropertyVersions {
            name: self.name,
            profile_id: self.profile_id,
            associations: self.associations,
            versions,
            comparator,
            current: None,
        }
    }
}

/// Versions available for every artifact associated with one property
#[derive(Debug, Clone)]
pub struct PropertyVersions {
    name: String,
    profile_id: Option<String>,
    associations: BTreeSet<ArtifactAssociation>,
    versions: Vec<ArtifactVersion>,
    comparator: VersionComparator,
    current: Option<ArtifactVersion>,
}

impl PropertyVersions {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }

    pub fn associations(&self) -> &BTreeSet<ArtifactAssociation> {
        &self.associations
    }

    pub fn is_associated(&self) -> bool {
        !self.associations.is_empty()
    }

    pub fn with_current_version(mut self, version: Option<&str>) -> Self {
        self.current = version.map(ArtifactVersion::new);
        self
    }

    /// Versions the reactor can supply for every association.
    ///
    /// Reactor artifacts whose version cannot be pinned to a single value are skipped.
    pub fn versions_from_reactor(&self, reactor: &[Coordinate]) -> Vec<ArtifactVersion> {
        let selected = |artifact: &Coordinate| -> Option<String> {
            match artifact.version.as_deref() {
                Some(version) if !version.starts_with(['[', '(']) => Some(version.to_string()),
                other => {
                    warn!(
                        "Property ${{{}}}: dropping reactor artifact {} without a selectable version ({:?})",
                        self.name,
                        artifact.versionless_key(),
                        other
                    );
                    None
                }
            }
        };

        let offered: Vec<(&ArtifactAssociation, Vec<String>)> = self
            .associations
            .iter()
            .map(|association| {
                let versions = reactor
                    .iter()
                    .filter(|artifact| artifact.same_artifact(&association.coordinate))
                    .filter_map(|artifact| selected(artifact))
                    .collect();
                (association, versions)
            })
            .collect();

        let mut result: Vec<ArtifactVersion> = offered
            .iter()
            .flat_map(|(_, versions)| versions.iter())
            .filter(|candidate| {
                offered
                    .iter()
                    .all(|(_, versions)| versions.iter().any(|v| v == *candidate))
            })
            .map(|candidate| ArtifactVersion::new(candidate))
            .collect();
        result.sort_by(|a, b| self.comparator.compare_versions(a, b));
        result.dedup();
        result
    }

    /// Newest version of the property admissible under `property`'s policy.
    ///
    /// `upper_bound_segment` is the most minor segment held at the current value; `None` puts
    /// no upper limit on the search. The current version itself is admissible, so a property
    /// without updates resolves to its current version.
    ///
    /// # Errors
    /// Returns `VersionsError::InvalidVersionSpecification` for a malformed `property.version`
    /// and `VersionsError::InvalidSegment` when `upper_bound_segment` does not exist in
    /// `current`.
    pub fn newest_version(
        &self,
        current: &str,
        property: &Property,
        allow_snapshots: bool,
        reactor: &[Coordinate],
        allow_downgrade: bool,
        upper_bound_segment: Option<Segment>,
    ) -> Result<Option<ArtifactVersion>, VersionsError> {
        let include_snapshots = allow_snapshots && !property.ban_snapshots;
        debug!(
            "Property ${{{}}}: include snapshots: {}, available versions: {:?}",
            property.name,
            include_snapshots,
            self.versions(include_snapshots)
                .iter()
                .map(ArtifactVersion::as_str)
                .collect::<Vec<_>>()
        );

        let range = property
            .version
            .as_deref()
            .map(VersionRange::parse)
            .transpose()?;

        let current_version = ArtifactVersion::new(current);
        let lower = if allow_downgrade {
            // a floor held only at the major segment falls back to the next finer one
            let floor_segment = upper_bound_segment.map(|segment| match segment {
                Segment::Major => Segment::Minor,
                other => other,
            });
            self.lower_bound(&current_version, floor_segment)?
        } else {
            Some(current_version.clone())
        };
        let upper = match upper_bound_segment {
            Some(segment) => {
                self.check_segment(&current_version, segment)?;
                Some(BoundedVersion::from_version(&current_version, Some(segment)))
            }
            None => None,
        };
        debug!(
            "Property ${{{}}}: range {:?}, lower bound {:?}, upper bound {:?}",
            property.name,
            range.as_ref().map(ToString::to_string),
            lower.as_ref().map(ToString::to_string),
            upper.as_ref().map(ToString::to_string)
        );

        let restriction = Restriction::new(
            lower.map(Version::from),
            true,
            upper.map(Version::from),
            allow_downgrade,
        );
        let mut result = self.newest_version_in(range.as_ref(), &restriction, include_snapshots);
        debug!("Property ${{{}}}: current winner is {:?}", property.name, result);

        if !property.search_reactor {
            return Ok(result);
        }

        let from_reactor = self
            .versions_from_reactor(reactor)
            .into_iter()
            .rev()
            .find(|v| range.as_ref().is_none_or(|r| r.contains_version(self.comparator, v)));

        if let Some(from_reactor) = from_reactor
            && (result.is_some() || from_reactor.as_str() != current)
        {
            result = match result {
                _ if property.prefer_reactor => {
                    debug!(
                        "Property ${{{}}}: reactor has {} and is preferred",
                        property.name, from_reactor
                    );
                    Some(from_reactor)
                }
                None => {
                    debug!("Property ${{{}}}: reactor has the only version", property.name);
                    Some(from_reactor)
                }
                Some(winner)
                    if self.comparator.compare_versions(&winner, &from_reactor)
                        == std::cmp::Ordering::Less =>
                {
                    debug!("Property ${{{}}}: reactor has newer {}", property.name, from_reactor);
                    Some(from_reactor)
                }
                Some(winner) => {
                    debug!(
                        "Property ${{{}}}: reactor has the same or an older version",
                        property.name
                    );
                    Some(winner)
                }
            };
        }
        Ok(result)
    }

    /// Floor of a downgrade: segments up to `segment` copied from `version`, the rest zeroed
    fn lower_bound(
        &self,
        version: &ArtifactVersion,
        segment: Option<Segment>,
    ) -> Result<Option<ArtifactVersion>, InvalidSegmentError> {
        let Some(segment) = segment else {
            return Ok(None);
        };
        self.check_segment(version, segment)?;
        let segment_count = self.comparator.segment_count(version);
        let held = |s: Segment| segment >= s;

        let mut floor = version.major().to_string();
        if segment_count > 1 {
            let minor = if held(Segment::Minor) { version.minor() } else { 0 };
            floor.push_str(&format!(".{minor}"));
        }
        if segment_count > 2 {
            let incremental = if held(Segment::Incremental) {
                version.incremental()
            } else {
                0
            };
            floor.push_str(&format!(".{incremental}"));
        }
        if segment_count > 3 {
            let tail = match (held(Segment::Subincremental), version.qualifier()) {
                (true, Some(qualifier)) => qualifier.to_string(),
                (true, None) => version.build_number().to_string(),
                (false, _) => "0".to_string(),
            };
            floor.push_str(&format!("-{tail}"));
        }
        Ok(Some(ArtifactVersion::new(&floor)))
    }
}

impl VersionDetails for PropertyVersions {
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

impl fmt::Display for PropertyVersions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyVersions{{")?;
        if let Some(profile_id) = &self.profile_id {
            write!(f, "profileId='{profile_id}', ")?;
        }
        let associations: Vec<String> = self.associations.iter().map(ToString::to_string).collect();
        write!(f, "name='{}', associations=[{}]}}", self.name, associations.join(", "))
    }
}
