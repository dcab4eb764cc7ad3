use thiserror::Error;

use crate::version::segment::Segment;
use crate::version::types::Coordinate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version specification '{spec}': {reason}")]
pub struct InvalidVersionSpecification {
    pub spec: String,
    pub reason: String,
}

impl InvalidVersionSpecification {
    pub fn new(spec: &str, reason: &str) -> Self {
        Self {
            spec: spec.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Segment {segment} is not meaningful for version {version} ({segment_count} segments)")]
pub struct InvalidSegmentError {
    pub version: String,
    pub segment: Segment,
    pub segment_count: usize,
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    InvalidConstraint(#[from] InvalidVersionSpecification),
}

#[derive(Debug, Error)]
#[error("Failed to retrieve versions of {coordinate}: {source}")]
pub struct VersionRetrievalError {
    pub coordinate: Coordinate,
    #[source]
    pub source: ResolverError,
}

#[derive(Debug, Error)]
pub enum VersionsError {
    #[error(transparent)]
    InvalidVersionSpecification(#[from] InvalidVersionSpecification),

    #[error(transparent)]
    InvalidSegment(#[from] InvalidSegmentError),

    #[error(transparent)]
    Retrieval(#[from] VersionRetrievalError),
}
