//! Comparison method implementations backing [`VersionComparator`](crate::version::comparator::VersionComparator)

pub mod maven;
pub mod mercury;
pub mod numeric;
