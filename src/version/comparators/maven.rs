//! Maven comparison method

use std::cmp::Ordering;

use crate::version::artifact_version::ArtifactVersion;
use crate::version::types::Version;

/// Compares under Maven rules.
///
/// A bound sentinel on either side is compared through its own padded form, so the
/// `i32::MAX` padding is always read as plain integers.
pub fn compare(a: &Version, b: &Version) -> Ordering {
    match (a, b) {
        (Version::Bounded(bound), other) => bound.compare_to(other),
        (other, Version::Bounded(bound)) => bound.compare_to(other).reverse(),
        (Version::Concrete(a), Version::Concrete(b)) => a.comparable().cmp(b.comparable()),
    }
}

/// Counts meaningful segments following Maven's `major.minor.incremental-build` convention.
/// A version Maven could not parse is a single qualifier segment.
pub fn segment_count(version: &ArtifactVersion) -> usize {
    if version.build_number() != 0 {
        return 4;
    }
    let has_numbers = version.major() != 0 || version.minor() != 0 || version.incremental() != 0;
    if has_numbers && version.qualifier().is_some() {
        return 4;
    }

    let value = version.as_str();
    let whole_string_is_qualifier = version.qualifier() == Some(value);
    if value.contains('-') {
        return if whole_string_is_qualifier { 1 } else { 4 };
    }
    if value.contains('.') {
        return if whole_string_is_qualifier { 1 } else { 3 };
    }
    if value.is_empty() {
        return 3;
    }
    match value.parse::<i32>() {
        Ok(_) => 3,
        Err(_) => 1,
    }
}
