//! Best-fit rule selection

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::rules::ignore::{IgnoreFilter, VALID_TYPES, is_valid_type};
use crate::rules::model::{IgnoreVersion, Rule, RuleSet};
use crate::rules::wildcard::WildcardPattern;
use crate::version::comparator::VersionComparator;
use crate::version::types::Coordinate;

/// Answers rule lookups for one rule set; owned by a session and shared by reference
pub struct RuleService {
    rule_set: RuleSet,
    /// Compiled `(groupId, artifactId)` patterns, one pair per rule
    patterns: Vec<(WildcardPattern, WildcardPattern)>,
    /// `groupId:artifactId` -> index of the best-fit rule
    best_fit_cache: RwLock<HashMap<String, Option<usize>>>,
}

impl RuleService {
    pub fn new(rule_set: RuleSet) -> Self {
        let patterns = rule_set
            .rules
            .iter()
            .map(|rule| {
                (
                    WildcardPattern::new(&rule.group_id),
                    WildcardPattern::new(&rule.artifact_id),
                )
            })
            .collect();
        Self {
            rule_set,
            patterns,
            best_fit_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Most specific rule matching the artifact.
    ///
    /// Group ids are compared first: a pattern with fewer wildcards wins, and once a pattern
    /// matched the whole group id only whole-value matches are considered. Artifact ids are
    /// then narrowed the same way among the surviving rules. Of equally specific rules the
    /// last one wins.
    pub fn best_fit_rule(&self, group_id: &str, artifact_id: &str) -> Option<&Rule> {
        let key = format!("{group_id}:{artifact_id}");
        let cached = self
            .best_fit_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied();

        let index = match cached {
            Some(index) => index,
            None => {
                let index = self.find_best_fit(group_id, artifact_id);
                self.best_fit_cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .entry(key)
                    .or_insert(index);
                index
            }
        };
        index.and_then(|i| self.rule_set.rules.get(i))
    }

    fn find_best_fit(&self, group_id: &str, artifact_id: &str) -> Option<usize> {
        let mut best_fit = None;
        let mut best_group_score = u32::MAX;
        let mut best_artifact_score = u32::MAX;
        let mut exact_group = false;
        let mut exact_artifact = false;

        for (index, (group_pattern, artifact_pattern)) in self.patterns.iter().enumerate() {
            let group_score = group_pattern.score();
            if group_score > best_group_score {
                continue;
            }
            let exact = group_pattern.matches(group_id, true);
            if !(exact || group_pattern.matches(group_id, false))
                || (exact_group && !exact)
            {
                continue;
            }
            if best_group_score > group_score {
                best_artifact_score = u32::MAX;
                exact_artifact = false;
            }
            best_group_score = group_score;
            if exact && !exact_group {
                exact_group = true;
                best_artifact_score = u32::MAX;
                exact_artifact = false;
            }

            let artifact_score = artifact_pattern.score();
            if artifact_score > best_artifact_score {
                continue;
            }
            let exact = artifact_pattern.matches(artifact_id, true);
            if !(exact || artifact_pattern.matches(artifact_id, false))
                || (exact_artifact && !exact)
            {
                continue;
            }
            best_artifact_score = artifact_score;
            exact_artifact |= exact;
            best_fit = Some(index);
        }

        debug!(
            "Best-fit rule for {}:{}: {:?}",
            group_id,
            artifact_id,
            best_fit.map(|i| &self.rule_set.rules[i])
        );
        best_fit
    }

    /// Global ignored versions followed by the best-fit rule's; entries of unknown type are
    /// dropped with a warning.
    pub fn ignored_versions(&self, coordinate: &Coordinate) -> Vec<IgnoreVersion> {
        let rule_ignores = self
            .best_fit_rule(&coordinate.group_id, &coordinate.artifact_id)
            .map(|rule| rule.ignore_versions.as_slice())
            .unwrap_or_default();

        self.rule_set
            .ignore_versions
            .iter()
            .chain(rule_ignores)
            .filter(|ignore| {
                let valid = is_valid_type(ignore);
                if !valid {
                    warn!(
                        "The type '{}' of ignoreVersion [{}] is not valid, use one of {:?}",
                        ignore.kind, ignore.version, VALID_TYPES
                    );
                }
                valid
            })
            .cloned()
            .collect()
    }

    /// Ignored versions of the artifact, compiled for matching many candidates
    pub fn ignore_filter(&self, coordinate: &Coordinate) -> IgnoreFilter {
        IgnoreFilter::new(&self.ignored_versions(coordinate))
    }

    /// Comparator of the best-fit rule, else of the rule set
    pub fn version_comparator(&self, group_id: &str, artifact_id: &str) -> VersionComparator {
        let method = self
            .best_fit_rule(group_id, artifact_id)
            .and_then(|rule| rule.comparison_method.as_deref())
            .unwrap_or(&self.rule_set.comparison_method);
        VersionComparator::for_method(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rule_service() -> RuleService {
        RuleService::new(RuleSet {
            comparison_method: "maven".to_string(),
            ignore_versions: vec![IgnoreVersion::regex(".*-alpha")],
            rules: vec![
                Rule::new("org.apache.maven", "*", Some("mercury")),
                Rule::new("com.*.maven", "*", Some("mercury")),
                Rule::new("com.mycompany.maven", "*", Some("maven"))
                    .with_ignore_versions(vec![IgnoreVersion::exact("2.0")]),
                Rule::new("com.mycompany.maven", "old-maven-plugin", Some("mercury")),
                Rule::new("com.mycompany.custom.maven", "plugins", Some("mercury")),
            ],
        })
    }

    #[rstest]
    #[case("net.foo", "bar", VersionComparator::Maven)]
    #[case("org.apache.maven", "plugins", VersionComparator::Mercury)]
    #[case("com.mycompany.custom.maven", "plugins", VersionComparator::Mercury)]
    #[case("com.mycompany.maven.plugins", "plugins", VersionComparator::Maven)]
    #[case("com.mycompany.maven", "new-maven-plugin", VersionComparator::Maven)]
    #[case("com.mycompany.maven", "old-maven-plugin", VersionComparator::Mercury)]
    fn version_comparator_uses_best_fit_rule(
        #[case] group_id: &str,
        #[case] artifact_id: &str,
        #[case] expected: VersionComparator,
    ) {
        assert_eq!(rule_service().version_comparator(group_id, artifact_id), expected);
    }

    #[test]
    fn exact_rule_beats_wildcard_rule() {
        let service = rule_service();

        let rule = service.best_fit_rule("com.mycompany.custom.maven", "plugins").unwrap();
        assert_eq!(rule.group_id, "com.mycompany.custom.maven");

        let rule = service.best_fit_rule("org.apache.maven", "anything").unwrap();
        assert_eq!((rule.group_id.as_str(), rule.artifact_id.as_str()), ("org.apache.maven", "*"));
    }

    #[test]
    fn literal_prefix_beats_wildcard_prefix() {
        let service = rule_service();

        let rule = service.best_fit_rule("com.mycompany.maven.plugins", "plugins").unwrap();

        assert_eq!(rule.group_id, "com.mycompany.maven");
    }

    #[test]
    fn equally_specific_rules_resolve_to_the_last_one() {
        // tie-break by rule order is kept for compatibility, not a documented policy
        let service = RuleService::new(RuleSet {
            rules: vec![
                Rule::new("org.example", "*", Some("numeric")),
                Rule::new("org.example", "*", Some("mercury")),
            ],
            ..RuleSet::default()
        });

        assert_eq!(
            service.version_comparator("org.example", "lib"),
            VersionComparator::Mercury
        );
    }

    #[test]
    fn rule_set_method_applies_without_matching_rule() {
        let service = RuleService::new(RuleSet {
            comparison_method: "numeric".to_string(),
            ..RuleSet::default()
        });

        assert!(service.best_fit_rule("org.example", "lib").is_none());
        assert_eq!(
            service.version_comparator("org.example", "lib"),
            VersionComparator::Numeric
        );
    }

    #[test]
    fn best_fit_rule_is_cached_per_coordinate() {
        let service = rule_service();

        let first = service.best_fit_rule("org.apache.maven", "core").map(|r| r as *const Rule);
        let second = service.best_fit_rule("org.apache.maven", "core").map(|r| r as *const Rule);

        assert_eq!(first, second);
        assert_eq!(service.best_fit_cache.read().unwrap().len(), 1);
    }

    #[test]
    fn ignored_versions_combine_global_and_rule_entries() {
        let service = rule_service();

        let ignored = service.ignored_versions(&Coordinate::new("com.mycompany.maven", "lib", None));

        assert_eq!(
            ignored,
            vec![IgnoreVersion::regex(".*-alpha"), IgnoreVersion::exact("2.0")]
        );
    }

    #[test]
    fn ignore_filter_matches_global_and_rule_entries() {
        let filter = rule_service().ignore_filter(&Coordinate::new("com.mycompany.maven", "lib", None));

        assert!(filter.is_ignored("3.0-alpha"));
        assert!(filter.is_ignored("2.0"));
        assert!(!filter.is_ignored("2.1"));
    }

    #[test]
    fn ignored_versions_drop_entries_of_unknown_type() {
        let service = RuleService::new(RuleSet {
            ignore_versions: vec![
                IgnoreVersion {
                    version: "1.0".to_string(),
                    kind: "range".to_string(),
                },
                IgnoreVersion::exact("1.1"),
            ],
            ..RuleSet::default()
        });

        let ignored = service.ignored_versions(&Coordinate::new("org.example", "lib", None));

        assert_eq!(ignored, vec![IgnoreVersion::exact("1.1")]);
    }
}
