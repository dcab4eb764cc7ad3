//! Build descriptor model
//!
//! A JSON rendition of a multi-module build: properties, dependency and plugin declarations,
//! repositories and child modules. The engine reads current property values and `${name}`
//! references from it; it never writes it back.

use std::path::Path;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;

use crate::version::resolver::Repository;
use crate::version::types::Coordinate;

static PROPERTY_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid property reference pattern"));

/// Names of the properties referenced as `${name}` in `value`, in order of appearance
pub fn property_references(value: &str) -> Vec<&str> {
    PROPERTY_REFERENCE
        .captures_iter(value)
        .filter_map(|captures| captures.get(1))
        .map(|name| name.as_str())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Plugin {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub dependencies: Vec<Coordinate>,
}

impl Plugin {
    pub fn new(group_id: &str, artifact_id: &str, version: Option<&str>) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.map(str::to_string),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<Coordinate>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, self.version.as_deref())
    }
}

/// Declarations active only under a named profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub properties: IndexMap<String, String>,
    pub dependencies: Vec<Coordinate>,
    pub dependency_management: Vec<Coordinate>,
    pub plugins: Vec<Plugin>,
    pub plugin_management: Vec<Plugin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectDescriptor {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub properties: IndexMap<String, String>,
    pub dependencies: Vec<Coordinate>,
    pub dependency_management: Vec<Coordinate>,
    pub plugins: Vec<Plugin>,
    pub plugin_management: Vec<Plugin>,
    pub profiles: Vec<Profile>,
    pub repositories: Vec<Repository>,
    pub plugin_repositories: Vec<Repository>,
    /// Child modules built in the same reactor
    pub modules: Vec<ProjectDescriptor>,
}

/// An artifact whose declared version references a property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyReference {
    pub property: String,
    pub profile_id: Option<String>,
    /// Declared coordinate with known properties interpolated into its version
    pub coordinate: Coordinate,
    pub uses_plugin_repositories: bool,
}

impl ProjectDescriptor {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_json(&json)?)
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, self.version.as_deref())
    }

    /// Current value of a property; profile properties are consulted after the project's own
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .or_else(|| {
                self.profiles
                    .iter()
                    .find_map(|profile| profile.properties.get(name))
            })
            .map(String::as_str)
    }

    /// Replaces every `${name}` whose value is known
    pub fn interpolate(&self, value: &str) -> String {
        PROPERTY_REFERENCE
            .replace_all(value, |captures: &regex::Captures| {
                let name = &captures[1];
                match self.property(name) {
                    Some(resolved) => resolved.to_string(),
                    None => captures[0].to_string(),
                }
            })
            .into_owned()
    }

    /// This project and every nested module
    pub fn reactor(&self) -> Vec<&ProjectDescriptor> {
        let mut projects = vec![self];
        for module in &self.modules {
            projects.extend(module.reactor());
        }
        projects
    }

    /// Coordinates of the artifacts the reactor builds
    pub fn reactor_artifacts(&self) -> Vec<Coordinate> {
        self.reactor()
            .into_iter()
            .map(ProjectDescriptor::coordinate)
            .collect()
    }

    /// Every dependency, managed dependency, plugin and plugin dependency whose version
    /// references a property, across the project and its profiles
    pub fn property_references(&self) -> Vec<PropertyReference> {
        let mut references = Vec::new();
        self.collect_references(
            None,
            self.dependencies.iter().chain(&self.dependency_management),
            self.plugins.iter().chain(&self.plugin_management),
            &mut references,
        );
        for profile in &self.profiles {
            self.collect_references(
                Some(&profile.id),
                profile.dependencies.iter().chain(&profile.dependency_management),
                profile.plugins.iter().chain(&profile.plugin_management),
                &mut references,
            );
        }
        references
    }

    fn collect_references<'a>(
        &self,
        profile_id: Option<&str>,
        dependencies: impl Iterator<Item = &'a Coordinate>,
        plugins: impl Iterator<Item = &'a Plugin>,
        references: &mut Vec<PropertyReference>,
    ) {
        let mut add = |coordinate: &Coordinate, uses_plugin_repositories: bool| {
            let Some(version) = coordinate.version.as_deref() else {
                return;
            };
            for property in property_references(version) {
                references.push(PropertyReference {
                    property: property.to_string(),
                    profile_id: profile_id.map(str::to_string),
                    coordinate: coordinate.with_version(Some(&self.interpolate(version))),
                    uses_plugin_repositories,
                });
            }
        };

        for dependency in dependencies {
            add(dependency, false);
        }
        for plugin in plugins {
            add(&plugin.coordinate(), true);
            for dependency in &plugin.dependencies {
                add(dependency, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn project() -> ProjectDescriptor {
        serde_json::from_value(json!({
            "groupId": "com.example",
            "artifactId": "parent",
            "version": "1.0",
            "properties": {
                "lib.version": "1.2",
                "plugin.version": "3.1"
            },
            "dependencies": [
                { "groupId": "org.lib", "artifactId": "core", "version": "${lib.version}" },
                { "groupId": "org.lib", "artifactId": "range", "version": "[${lib.version},2.0)" },
                { "groupId": "org.other", "artifactId": "fixed", "version": "4.0" }
            ],
            "plugins": [
                {
                    "groupId": "org.plugins",
                    "artifactId": "compiler",
                    "version": "${plugin.version}",
                    "dependencies": [
                        { "groupId": "org.lib", "artifactId": "extra", "version": "${lib.version}" }
                    ]
                }
            ],
            "profiles": [
                {
                    "id": "ci",
                    "properties": { "ci.version": "0.9" },
                    "dependencies": [
                        { "groupId": "org.ci", "artifactId": "agent", "version": "${ci.version}" }
                    ]
                }
            ],
            "modules": [
                { "groupId": "com.example", "artifactId": "child", "version": "1.0" }
            ]
        }))
        .unwrap()
    }

    #[rstest]
    #[case("${lib.version}", vec!["lib.version"])]
    #[case("[${a},${b})", vec!["a", "b"])]
    #[case("1.0", vec![])]
    fn finds_property_references(#[case] value: &str, #[case] expected: Vec<&str>) {
        assert_eq!(property_references(value), expected);
    }

    #[test]
    fn property_falls_back_to_profiles() {
        let project = project();

        assert_eq!(project.property("lib.version"), Some("1.2"));
        assert_eq!(project.property("ci.version"), Some("0.9"));
        assert_eq!(project.property("missing"), None);
    }

    #[test]
    fn interpolate_keeps_unknown_references() {
        let project = project();

        assert_eq!(project.interpolate("[${lib.version},${unknown})"), "[1.2,${unknown})");
    }

    #[test]
    fn property_references_cover_dependencies_plugins_and_profiles() {
        let references = project().property_references();

        let summary: Vec<(&str, &str, &str, bool, Option<&str>)> = references
            .iter()
            .map(|r| {
                (
                    r.property.as_str(),
                    r.coordinate.artifact_id.as_str(),
                    r.coordinate.version.as_deref().unwrap_or_default(),
                    r.uses_plugin_repositories,
                    r.profile_id.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("lib.version", "core", "1.2", false, None),
                ("lib.version", "range", "[1.2,2.0)", false, None),
                ("plugin.version", "compiler", "3.1", true, None),
                ("lib.version", "extra", "1.2", false, None),
                ("ci.version", "agent", "0.9", false, Some("ci")),
            ]
        );
    }

    #[test]
    fn reactor_includes_nested_modules() {
        let artifacts = project().reactor_artifacts();

        assert_eq!(
            artifacts,
            vec![
                Coordinate::new("com.example", "parent", Some("1.0")),
                Coordinate::new("com.example", "child", Some("1.0")),
            ]
        );
    }
}
