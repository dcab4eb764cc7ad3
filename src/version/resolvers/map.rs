//! In-memory resolver backed by a `groupId:artifactId -> versions` map

use std::collections::HashMap;

use tracing::debug;

use crate::version::error::ResolverError;
use crate::version::resolver::{Repository, VersionRangeResolver, filter_by_constraint};
use crate::version::types::Coordinate;

/// Serves versions from a fixed map regardless of the requested repositories
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    versions: HashMap<String, Vec<String>>,
}

impl MapResolver {
    pub fn new(versions: HashMap<String, Vec<String>>) -> Self {
        Self { versions }
    }

    /// Parses `{"groupId:artifactId": ["1.0", ...]}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn insert(&mut self, group_id: &str, artifact_id: &str, versions: &[&str]) {
        self.versions.insert(
            format!("{group_id}:{artifact_id}"),
            versions.iter().map(|v| v.to_string()).collect(),
        );
    }
}

#[async_trait::async_trait]
impl VersionRangeResolver for MapResolver {
    async fn resolve_version_range(
        &self,
        coordinate: &Coordinate,
        constraint: &str,
        _repositories: &[Repository],
    ) -> Result<Vec<String>, ResolverError> {
        let key = coordinate.versionless_key();
        let Some(versions) = self.versions.get(&key) else {
            debug!("No versions known for {}", key);
            return Ok(Vec::new());
        };
        filter_by_constraint(versions.clone(), constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::resolver::ANY_VERSION;

    #[tokio::test]
    async fn resolve_version_range_filters_known_versions() {
        let resolver =
            MapResolver::from_json(r#"{"org.example:lib": ["1.0", "1.1", "2.0"]}"#).unwrap();
        let coordinate = Coordinate::new("org.example", "lib", Some("1.0"));

        let result = resolver
            .resolve_version_range(&coordinate, "[1.1,)", &[])
            .await
            .unwrap();

        assert_eq!(result, vec!["1.1".to_string(), "2.0".to_string()]);
    }

    #[tokio::test]
    async fn resolve_version_range_returns_empty_for_unknown_artifact() {
        let resolver = MapResolver::default();
        let coordinate = Coordinate::new("org.example", "missing", None);

        let result = resolver
            .resolve_version_range(&coordinate, ANY_VERSION, &[])
            .await
            .unwrap();

        assert!(result.is_empty());
    }
}
