//! Version ranges and restrictions
//!
//! Range specifications follow Maven syntax: `[1.0,2.0)`, `(,1.0],[1.2,)`, `[1.5]`, or a bare
//! soft requirement such as `1.0`. Containment is always decided by a [`VersionComparator`] with
//! the bound as the left operand, so a [`BoundedVersion`](crate::version::bound::BoundedVersion)
//! bound is compared through its padded form.

use std::cmp::Ordering;
use std::fmt;

use crate::version::artifact_version::ArtifactVersion;
use crate::version::comparator::VersionComparator;
use crate::version::error::InvalidVersionSpecification;
use crate::version::types::Version;

/// One contiguous interval of versions; a missing bound is unlimited on that side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restriction {
    lower: Option<Version>,
    lower_inclusive: bool,
    upper: Option<Version>,
    upper_inclusive: bool,
}

impl Restriction {
    pub fn new(
        lower: Option<Version>,
        lower_inclusive: bool,
        upper: Option<Version>,
        upper_inclusive: bool,
    ) -> Self {
        Self {
            lower,
            lower_inclusive,
            upper,
            upper_inclusive,
        }
    }

    /// Matches every version
    pub fn everything() -> Self {
        Self::new(None, false, None, false)
    }

    pub fn lower(&self) -> Option<&Version> {
        self.lower.as_ref()
    }

    pub fn upper(&self) -> Option<&Version> {
        self.upper.as_ref()
    }

    pub fn lower_inclusive(&self) -> bool {
        self.lower_inclusive
    }

    pub fn upper_inclusive(&self) -> bool {
        self.upper_inclusive
    }

    pub fn contains(&self, comparator: VersionComparator, candidate: &ArtifactVersion) -> bool {
        let candidate = Version::from(candidate);
        if let Some(lower) = &self.lower {
            match comparator.compare(lower, &candidate) {
                Ordering::Greater => return false,
                Ordering::Equal if !self.lower_inclusive => return false,
                _ => {}
            }
        }
        if let Some(upper) = &self.upper {
            match comparator.compare(upper, &candidate) {
                Ordering::Less => return false,
                Ordering::Equal if !self.upper_inclusive => return false,
                _ => {}
            }
        }
        true
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lower_inclusive { '[' } else { '(' };
        let close = if self.upper_inclusive { ']' } else { ')' };
        match (&self.lower, &self.upper) {
            (Some(lower), Some(upper)) if lower == upper && self.lower_inclusive => {
                write!(f, "[{lower}]")
            }
            (lower, upper) => {
                write!(f, "{open}")?;
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                f.write_str(",")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                write!(f, "{close}")
            }
        }
    }
}

/// A parsed version range: either a soft recommended version or a list of restrictions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    spec: String,
    recommended: Option<ArtifactVersion>,
    restrictions: Vec<Restriction>,
}

impl VersionRange {
    pub fn parse(spec: &str) -> Result<Self, InvalidVersionSpecification> {
        let invalid = |reason: &str| InvalidVersionSpecification::new(spec, reason);

        let mut restrictions = Vec::new();
        let mut previous_upper: Option<ArtifactVersion> = None;
        let mut process = spec.trim();

        while process.starts_with('[') || process.starts_with('(') {
            let close = match (process.find(')'), process.find(']')) {
                (Some(paren), Some(bracket)) => paren.min(bracket),
                (Some(index), None) | (None, Some(index)) => index,
                (None, None) => return Err(invalid("unbounded range")),
            };

            let (restriction, lower, upper) = parse_restriction(spec, &process[..=close])?;
            if let Some(previous) = &previous_upper {
                let overlaps = match &lower {
                    None => true,
                    Some(lower) => lower.comparable() < previous.comparable(),
                };
                if overlaps {
                    return Err(invalid("ranges overlap"));
                }
            }
            restrictions.push(restriction);
            previous_upper = upper;

            process = process[close + 1..].trim();
            if let Some(rest) = process.strip_prefix(',') {
                process = rest.trim();
            }
        }

        let mut recommended = None;
        if !process.is_empty() {
            if !restrictions.is_empty() {
                return Err(invalid(
                    "only fully-qualified sets allowed in multiple set scenario",
                ));
            }
            recommended = Some(ArtifactVersion::new(process));
            restrictions.push(Restriction::everything());
        }

        Ok(Self {
            spec: spec.to_string(),
            recommended,
            restrictions,
        })
    }

    /// Soft requirement of a bare version specification
    pub fn recommended_version(&self) -> Option<&ArtifactVersion> {
        self.recommended.as_ref()
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// True when the range actually narrows the candidates (a soft requirement does not)
    pub fn has_restrictions(&self) -> bool {
        !self.restrictions.is_empty() && self.recommended.is_none()
    }

    pub fn contains_version(&self, comparator: VersionComparator, version: &ArtifactVersion) -> bool {
        self.restrictions
            .iter()
            .any(|restriction| restriction.contains(comparator, version))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// Returns true if `spec` is written in range syntax rather than as a single version
pub fn is_range_spec(spec: &str) -> bool {
    let spec = spec.trim_start();
    spec.starts_with('[') || spec.starts_with('(')
}

type ParsedRestriction =(Restriction, Option<ArtifactVersion>, Option<ArtifactVersion>);

fn parse_restriction(spec: &str, restriction: &str) -> Result<ParsedRestriction, InvalidVersionSpecification> {
    let invalid = |reason: &str| InvalidVersionSpecification::new(spec, reason);

    let lower_inclusive = restriction.starts_with('[');
    let upper_inclusive = restriction.ends_with(']');
    let inner = restriction[1..restriction.len() - 1].trim();

    let Some((lower, upper)) = inner.split_once(',') else {
        if !lower_inclusive || !upper_inclusive {
            return Err(invalid("single version must be surrounded by []"));
        }
        let version = ArtifactVersion::new(inner);
        return Ok((
            Restriction::new(
                Some(Version::from(&version)),
                true,
                Some(Version::from(&version)),
                true,
            ),
            Some(version.clone()),
            Some(version),
        ));
    };

    let (lower, upper) = (lower.trim(), upper.trim());
    if lower == upper && !lower.is_empty() {
        return Err(invalid("range cannot have identical boundaries"));
    }
    let lower = (!lower.is_empty()).then(|| ArtifactVersion::new(lower));
    let upper = (!upper.is_empty()).then(|| ArtifactVersion::new(upper));
    if let (Some(lower), Some(upper)) = (&lower, &upper)
        && upper.comparable() < lower.comparable()
    {
        return Err(invalid("range defines an empty set"));
    }

    Ok((
        Restriction::new(
            lower.as_ref().map(Version::from),
            lower_inclusive,
            upper.as_ref().map(Version::from),
            upper_inclusive,
        ),
        lower,
        upper,
    ))
}
