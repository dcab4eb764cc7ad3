//! Rule-set loading and best-fit selection

mod helper;

use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use helper::rule_set;
use versions_engine::rules::loader::{RuleSetSource, load_rule_set};
use versions_engine::rules::RuleService;
use versions_engine::transport::{FileTransport, Transports};
use versions_engine::version::comparator::VersionComparator;
use versions_engine::version::types::Coordinate;

fn rules() -> serde_json::Value {
    json!({
        "comparisonMethod": "maven",
        "rules": [
            { "groupId": "*", "comparisonMethod": "numeric" },
            { "groupId": "org.apache.maven", "comparisonMethod": "mercury" },
            { "groupId": "org.apache.*", "artifactId": "maven-*", "comparisonMethod": "numeric" },
            {
                "groupId": "com.mycompany.custom.maven",
                "artifactId": "plugins",
                "comparisonMethod": "mercury",
                "ignoreVersions": [{ "type": "regex", "version": ".*-beta" }]
            },
            { "groupId": "com.mycompany.*", "artifactId": "plugins", "comparisonMethod": "numeric" }
        ]
    })
}

#[rstest]
#[case("com.mycompany.custom.maven", "plugins", VersionComparator::Mercury)]
#[case("com.mycompany.other", "plugins", VersionComparator::Numeric)]
#[case("org.apache.maven", "anything", VersionComparator::Mercury)]
#[case("org.apache.commons", "maven-model", VersionComparator::Numeric)]
#[case("net.example", "tool", VersionComparator::Numeric)]
fn best_fit_rule_selects_comparator(
    #[case] group_id: &str,
    #[case] artifact_id: &str,
    #[case] expected: VersionComparator,
) {
    let service = RuleService::new(rule_set(rules()));

    assert_eq!(service.version_comparator(group_id, artifact_id), expected);
}

#[test]
fn ignored_versions_combine_global_and_rule_entries() {
    let mut value = rules();
    value["ignoreVersions"] = json!([{ "type": "regex", "version": ".*-alpha.*" }]);
    let service = RuleService::new(rule_set(value));

    let ignored = service.ignored_versions(&Coordinate::new("com.mycompany.custom.maven", "plugins", None));

    let patterns: Vec<&str> = ignored.iter().map(|i| i.version.as_str()).collect();
    assert_eq!(patterns, vec![".*-alpha.*", ".*-beta"]);
}

#[tokio::test]
async fn rule_set_is_loaded_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    std::fs::write(&path, rules().to_string()).unwrap();
    let ignored = vec![".*-SNAPSHOT".to_string()];

    let rule_set = load_rule_set(
        &Transports::new(vec![Box::new(FileTransport)]),
        RuleSetSource {
            uri: path.to_str(),
            ignored_versions: &ignored,
            ..RuleSetSource::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(rule_set.rules.len(), 5);
    assert_eq!(rule_set.ignore_versions.len(), 1);
    assert_eq!(rule_set.ignore_versions[0].version, ".*-SNAPSHOT");
    let service = RuleService::new(rule_set);
    assert_eq!(
        service.version_comparator("org.apache.maven", "maven-core"),
        VersionComparator::Mercury
    );
}

#[tokio::test]
async fn missing_rule_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");

    let result = load_rule_set(
        &Transports::new(vec![Box::new(FileTransport)]),
        RuleSetSource {
            uri: path.to_str(),
            ..RuleSetSource::default()
        },
    )
    .await;

    assert!(result.is_err());
}
