//! Version range resolver trait for querying remote repositories

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::version::artifact_version::ArtifactVersion;
use crate::version::comparator::VersionComparator;
use crate::version::error::ResolverError;
use crate::version::range::VersionRange;
use crate::version::types::Coordinate;

/// Constraint matching every version, used when nothing narrower is declared
pub const ANY_VERSION: &str = "(,)";

/// A remote repository versions are looked up in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub url: String,
}

impl Repository {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
        }
    }
}

/// Trait for listing the versions of an artifact available in a set of repositories
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait VersionRangeResolver: Send + Sync {
    /// Lists the versions of `coordinate` matching `constraint`
    ///
    /// # Arguments
    /// * `coordinate` - The artifact; its version is ignored
    /// * `constraint` - A version range such as `[1.0,)`, or a soft version matching everything
    /// * `repositories` - Repositories to query
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Available version strings in no particular order
    /// * `Err(ResolverError)` - If the repositories could not be queried
    async fn resolve_version_range(
        &self,
        coordinate: &Coordinate,
        constraint: &str,
        repositories: &[Repository],
    ) -> Result<Vec<String>, ResolverError>;
}

/// Keeps the versions contained in `constraint` under Maven ordering
pub fn filter_by_constraint(
    versions: Vec<String>,
    constraint: &str,
) -> Result<Vec<String>, ResolverError> {
    let range = VersionRange::parse(constraint)?;
    if !range.has_restrictions() {
        return Ok(versions);
    }
    Ok(versions
        .into_iter()
        .filter(|v| range.contains_version(VersionComparator::Maven, &ArtifactVersion::new(v)))
        .collect())
}
