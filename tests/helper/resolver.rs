//! Resolver test utilities

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use versions_engine::rules::{RuleService, RuleSet};
use versions_engine::version::error::ResolverError;
use versions_engine::version::helper::VersionsHelper;
use versions_engine::version::resolver::{Repository, VersionRangeResolver, filter_by_constraint};
use versions_engine::version::types::Coordinate;

/// Stub resolver serving fixed versions per `groupId:artifactId`
#[derive(Default)]
pub struct StubResolver {
    versions: HashMap<String, Vec<String>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_versions(mut self, key: &str, versions: Vec<&str>) -> Self {
        self.versions.insert(
            key.to_string(),
            versions.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Lookups of `key` fail with a network error
    pub fn failing(mut self, key: &str) -> Self {
        self.failing.insert(key.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VersionRangeResolver for StubResolver {
    async fn resolve_version_range(
        &self,
        coordinate: &Coordinate,
        constraint: &str,
        _repositories: &[Repository],
    ) -> Result<Vec<String>, ResolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = coordinate.versionless_key();
        if self.failing.contains(&key) {
            return Err(ResolverError::Network(format!("{key} is unreachable")));
        }
        let versions = self.versions.get(&key).cloned().unwrap_or_default();
        filter_by_constraint(versions, constraint)
    }
}

pub fn repositories() -> Vec<Repository> {
    vec![Repository::new("central", "https://repo.example.com/maven2")]
}

/// Creates a helper over `resolver` with one project and one plugin repository
pub fn create_helper(resolver: Arc<StubResolver>, rule_set: RuleSet) -> VersionsHelper {
    VersionsHelper::new(
        resolver,
        RuleService::new(rule_set),
        repositories(),
        vec![Repository::new("plugins", "https://plugins.example.com/maven2")],
    )
}

pub fn rule_set(value: Value) -> RuleSet {
    serde_json::from_value(value).unwrap()
}
