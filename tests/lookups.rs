//! Artifact lookup tests through the versions helper

mod helper;

use std::sync::Arc;

use rstest::rstest;
use serde_json::json;

use helper::{StubResolver, create_helper, rule_set};
use versions_engine::project::Plugin;
use versions_engine::rules::RuleSet;
use versions_engine::version::artifact_version::ArtifactVersion;
use versions_engine::version::comparator::VersionComparator;
use versions_engine::version::details::VersionDetails;
use versions_engine::version::error::ResolverError;
use versions_engine::version::segment::Segment;
use versions_engine::version::types::Coordinate;

fn strings(versions: &[ArtifactVersion]) -> Vec<String> {
    versions.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn newest_minor_update_excludes_snapshots_and_next_major() {
    let resolver = Arc::new(
        StubResolver::new().with_versions("org.lib:core", vec!["1.0", "1.1", "1.2", "2.0-SNAPSHOT"]),
    );
    let helper = create_helper(resolver, RuleSet::default());

    let versions = helper
        .lookup_artifact_versions(&Coordinate::new("org.lib", "core", Some("1.0")), None, false, true)
        .await
        .unwrap();

    let newest = versions.newest_update(Some(Segment::Minor), false).unwrap();
    assert_eq!(newest.map(|v| v.to_string()), Some("1.2".to_string()));
}

#[rstest]
#[case(None, vec!["1.0.1", "1.1.0", "2.0.0"])]
#[case(Some(Segment::Minor), vec!["1.0.1", "1.1.0"])]
#[case(Some(Segment::Incremental), vec!["1.0.1"])]
#[tokio::test]
async fn dependency_updates_follow_scope(#[case] scope: Option<Segment>, #[case] expected: Vec<&str>) {
    let resolver = Arc::new(
        StubResolver::new().with_versions("org.lib:core", vec!["0.9.0", "1.0.0", "1.0.1", "1.1.0", "2.0.0"]),
    );
    let helper = create_helper(resolver, RuleSet::default());

    let updates = helper
        .lookup_dependency_updates(&Coordinate::new("org.lib", "core", Some("1.0.0")), false, true, false)
        .await
        .unwrap();

    assert_eq!(strings(&updates.all_updates(scope, false).unwrap()), expected);
}

#[tokio::test]
async fn rules_select_comparator_and_ignored_versions() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_versions("org.apache.maven:maven-core", vec!["3.8.1", "3.9.0-alpha-1", "3.9.0"])
            .with_versions("com.mycompany.maven:tools", vec!["1.0", "2.0", "2.1"]),
    );
    let rules = rule_set(json!({
        "comparisonMethod": "maven",
        "ignoreVersions": [{ "type": "regex", "version": ".*-alpha.*" }],
        "rules": [
            { "groupId": "org.apache.maven", "comparisonMethod": "mercury" },
            {
                "groupId": "com.mycompany.maven",
                "ignoreVersions": [{ "version": "2.0" }]
            }
        ]
    }));
    let helper = create_helper(resolver, rules);

    let maven = helper
        .lookup_artifact_versions(&Coordinate::new("org.apache.maven", "maven-core", None), None, false, true)
        .await
        .unwrap();
    let tools = helper
        .lookup_artifact_versions(&Coordinate::new("com.mycompany.maven", "tools", None), None, false, true)
        .await
        .unwrap();

    assert_eq!(maven.comparator(), VersionComparator::Mercury);
    assert_eq!(strings(&maven.versions(true)), vec!["3.8.1", "3.9.0"]);
    assert_eq!(tools.comparator(), VersionComparator::Maven);
    assert_eq!(strings(&tools.versions(true)), vec!["1.0", "2.1"]);
}

#[tokio::test]
async fn batch_lookup_is_ordered_by_coordinate() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_versions("org.b:lib", vec!["1.0", "1.1"])
            .with_versions("org.a:lib", vec!["2.0", "3.0"])
            .with_versions("org.a:api", vec!["1.0"]),
    );
    let helper = create_helper(resolver.clone(), RuleSet::default()).with_parallelism(2);
    let dependencies = vec![
        Coordinate::new("org.b", "lib", Some("1.0")),
        Coordinate::new("org.a", "lib", Some("2.0")),
        Coordinate::new("org.a", "api", Some("1.0")),
    ];

    let updates = helper
        .lookup_dependencies_updates(dependencies, false, true, false)
        .await
        .unwrap();

    let keys: Vec<String> = updates.keys().map(Coordinate::versionless_key).collect();
    assert_eq!(keys, vec!["org.a:api", "org.a:lib", "org.b:lib"]);
    assert_eq!(resolver.calls(), 3);
}

#[tokio::test]
async fn batch_lookup_fails_as_a_whole() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_versions("org.a:lib", vec!["1.0"])
            .failing("org.b:lib"),
    );
    let helper = create_helper(resolver, RuleSet::default());
    let dependencies = vec![
        Coordinate::new("org.a", "lib", Some("1.0")),
        Coordinate::new("org.b", "lib", Some("1.0")),
    ];

    let err = helper
        .lookup_dependencies_updates(dependencies, false, true, false)
        .await
        .unwrap_err();

    assert_eq!(err.coordinate.versionless_key(), "org.b:lib");
    assert!(matches!(err.source, ResolverError::Network(_)));
}

#[tokio::test]
async fn plugin_updates_include_dependency_updates() {
    let resolver = Arc::new(
        StubResolver::new()
            .with_versions("org.plugins:compiler", vec!["3.0", "3.1"])
            .with_versions("org.lib:core", vec!["1.0", "1.1"]),
    );
    let helper = create_helper(resolver, RuleSet::default());
    let plugins = vec![
        Plugin::new("org.plugins", "compiler", Some("3.1"))
            .with_dependencies(vec![Coordinate::new("org.lib", "core", Some("1.0"))]),
    ];

    let updates = helper.lookup_plugins_updates(plugins, false).await.unwrap();

    let details = &updates[&Coordinate::new("org.plugins", "compiler", Some("3.1"))];
    assert!(!details.is_artifact_update_available());
    assert!(details.is_dependency_update_available());
    let core = &details.dependency_versions()[&Coordinate::new("org.lib", "core", Some("1.0"))];
    assert_eq!(strings(&core.versions(false)), vec!["1.1"]);
}

#[tokio::test]
async fn segment_updates_summarize_each_granularity() {
    let resolver = Arc::new(StubResolver::new().with_versions(
        "org.lib:core",
        vec!["1.2.3", "1.2.4", "1.3.0", "1.4.1", "2.0.0"],
    ));
    let helper = create_helper(resolver, RuleSet::default());

    let versions = helper
        .lookup_artifact_versions(&Coordinate::new("org.lib", "core", Some("1.2.3")), None, false, true)
        .await
        .unwrap();
    let by_segment = versions.updates_by_segment(false);

    let newest = |segment: Segment| by_segment[&segment].newest.as_ref().map(ToString::to_string);
    assert_eq!(newest(Segment::Major), Some("2.0.0".to_string()));
    assert_eq!(newest(Segment::Minor), Some("1.4.1".to_string()));
    assert_eq!(newest(Segment::Incremental), Some("1.2.4".to_string()));
    assert_eq!(newest(Segment::Subincremental), None);
}
