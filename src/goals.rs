//! Update goals run against a build descriptor
//!
//! Each goal combines lookups of the [`VersionsHelper`] with the update policy of a run and
//! reports one entry per dependency, plugin or property.

use tracing::{info, warn};

use crate::project::ProjectDescriptor;
use crate::recording::{DependencyChangeKind, VersionChange, VersionChangeRecorder};
use crate::version::artifact_version::ArtifactVersion;
use crate::version::artifact_versions::ArtifactVersions;
use crate::version::details::VersionDetails;
use crate::version::error::VersionsError;
use crate::version::helper::{VersionPropertiesMapRequest, VersionsHelper};
use crate::version::property_versions::Property;
use crate::version::segment::Segment;
use crate::version::types::Coordinate;

#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyUpdateOptions {
    pub allow_snapshots: bool,
    /// Most major segment allowed to change; `None` allows any update
    pub scope: Option<Segment>,
    pub use_plugin_repositories: bool,
    pub use_project_repositories: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub kind: DependencyChangeKind,
    pub coordinate: Coordinate,
    pub newest: Option<ArtifactVersion>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyUpdateOptions<'a> {
    pub allow_snapshots: bool,
    pub allow_downgrade: bool,
    /// Most minor segment held at the current value
    pub upper_bound_segment: Option<Segment>,
    pub include_properties: Option<&'a str>,
    pub exclude_properties: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyUpdate {
    pub property: Property,
    pub newest: Option<ArtifactVersion>,
}

impl DependencyUpdate {
    /// The recorded change when a newer version than the declared one was found
    pub fn change(&self) -> Option<VersionChange> {
        let current = self.coordinate.version.as_deref()?;
        let newest = self.newest.as_ref()?;
        (newest.as_str() != current).then(|| {
            VersionChange::dependency(
                self.kind,
                &self.coordinate.group_id,
                &self.coordinate.artifact_id,
                current,
                newest.as_str(),
            )
        })
    }
}

impl PropertyUpdate {
    /// True when the newest version differs from the current value
    pub fn is_change(&self) -> bool {
        match (&self.newest, self.property.value.as_deref()) {
            (Some(newest), Some(current)) => newest.as_str() != current,
            _ => false,
        }
    }
}

fn newest_update(
    kind: DependencyChangeKind,
    versions: &ArtifactVersions,
    options: &DependencyUpdateOptions,
) -> Option<DependencyUpdate> {
    match versions.newest_update(options.scope, options.allow_snapshots) {
        Ok(newest) => Some(DependencyUpdate {
            kind,
            coordinate: versions.coordinate().clone(),
            newest,
        }),
        Err(e) => {
            warn!("Skipping {}: {}", versions.coordinate(), e);
            None
        }
    }
}

/// Newest update of every dependency and plugin declared by the project, recording each
/// available update
pub async fn dependency_updates(
    helper: &VersionsHelper,
    project: &ProjectDescriptor,
    options: DependencyUpdateOptions,
    recorder: &mut dyn VersionChangeRecorder,
) -> Result<Vec<DependencyUpdate>, VersionsError> {
    let mut updates = Vec::new();

    let groups = [
        (DependencyChangeKind::DependencyUpdate, &project.dependencies),
        (
            DependencyChangeKind::DependencyManagementUpdate,
            &project.dependency_management,
        ),
    ];
    for (kind, dependencies) in groups {
        let found = helper
            .lookup_dependencies_updates(
                dependencies.iter().cloned(),
                options.use_plugin_repositories,
                options.use_project_repositories,
                options.allow_snapshots,
            )
            .await?;
        updates.extend(
            found
                .values()
                .filter_map(|versions| newest_update(kind, versions, &options)),
        );
    }

    let groups = [
        (DependencyChangeKind::PluginUpdate, &project.plugins),
        (DependencyChangeKind::PluginManagementUpdate, &project.plugin_management),
    ];
    for (kind, plugins) in groups {
        let found = helper
            .lookup_plugins_updates(plugins.iter().cloned(), options.allow_snapshots)
            .await?;
        for details in found.values() {
            updates.extend(newest_update(kind, details.artifact_versions(), &options));
            updates.extend(details.dependency_versions().values().filter_map(|versions| {
                newest_update(DependencyChangeKind::DependencyUpdate, versions, &options)
            }));
        }
    }

    for change in updates.iter().filter_map(DependencyUpdate::change) {
        recorder.record_change(change);
    }
    info!("Checked {} artifacts for updates", updates.len());
    Ok(updates)
}

/// Newest admissible value of every property, recording each change
pub async fn property_updates(
    helper: &VersionsHelper,
    project: &ProjectDescriptor,
    definitions: &[Property],
    options: PropertyUpdateOptions<'_>,
    recorder: &mut dyn VersionChangeRecorder,
) -> Result<Vec<PropertyUpdate>, VersionsError> {
    let request = VersionPropertiesMapRequest {
        property_definitions: definitions,
        include_properties: options.include_properties,
        exclude_properties: options.exclude_properties,
        ..VersionPropertiesMapRequest::new(project)
    };
    let properties = helper.get_version_properties_map(request).await?;
    let reactor = project.reactor_artifacts();

    let mut updates = Vec::with_capacity(properties.len());
    for (property, versions) in properties {
        let Some(current) = property.value.clone() else {
            warn!("Property ${{{}}} has no current value", property.name);
            updates.push(PropertyUpdate {
                property,
                newest: None,
            });
            continue;
        };
        let newest = versions.newest_version(
            &current,
            &property,
            options.allow_snapshots,
            &reactor,
            options.allow_downgrade,
            options.upper_bound_segment,
        )?;

        let update = PropertyUpdate { property, newest };
        if update.is_change()
            && let Some(newest) = &update.newest
        {
            info!(
                "Updated ${{{}}} from {} to {}",
                update.property.name, current, newest
            );
            recorder.record_change(VersionChange::property(
                &update.property.name,
                &current,
                newest.as_str(),
            ));
        }
        updates.push(update);
    }
    Ok(updates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::JsonRecorder;
    use crate::rules::{RuleService, RuleSet};
    use crate::version::resolvers::MapResolver;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn helper() -> VersionsHelper {
        let mut resolver = MapResolver::default();
        resolver.insert("org.lib", "api", &["1.0", "1.1", "1.2", "2.0"]);
        resolver.insert("org.lib", "impl", &["1.0", "1.1", "1.2", "2.0", "2.1"]);
        resolver.insert("org.plugins", "compiler", &["3.0", "3.1", "4.0"]);
        VersionsHelper::new(
            Arc::new(resolver),
            RuleService::new(RuleSet::default()),
            vec![],
            vec![],
        )
    }

    fn project() -> ProjectDescriptor {
        serde_json::from_value(json!({
            "groupId": "com.example",
            "artifactId": "app",
            "version": "1.0",
            "properties": { "lib.version": "1.0" },
            "dependencies": [
                { "groupId": "org.lib", "artifactId": "api", "version": "${lib.version}" },
                { "groupId": "org.lib", "artifactId": "impl", "version": "${lib.version}" }
            ],
            "plugins": [
                { "groupId": "org.plugins", "artifactId": "compiler", "version": "3.0" }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn dependency_updates_report_newest_within_scope() {
        let project: ProjectDescriptor = serde_json::from_value(json!({
            "dependencies": [
                { "groupId": "org.lib", "artifactId": "api", "version": "1.0" }
            ],
            "plugins": [
                { "groupId": "org.plugins", "artifactId": "compiler", "version": "3.0" }
            ]
        }))
        .unwrap();
        let options = DependencyUpdateOptions {
            scope: Some(Segment::Minor),
            use_project_repositories: true,
            ..DependencyUpdateOptions::default()
        };

        let mut recorder = JsonRecorder::new("dependency-updates");

        let updates = dependency_updates(&helper(), &project, options, &mut recorder)
            .await
            .unwrap();

        let summary: Vec<(DependencyChangeKind, String, Option<String>)> = updates
            .iter()
            .map(|u| {
                (
                    u.kind,
                    u.coordinate.artifact_id.clone(),
                    u.newest.as_ref().map(ToString::to_string),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                (DependencyChangeKind::DependencyUpdate, "api".to_string(), Some("1.2".to_string())),
                (DependencyChangeKind::PluginUpdate, "compiler".to_string(), Some("3.1".to_string())),
            ]
        );
        assert_eq!(
            recorder.changes(),
            &[
                VersionChange::dependency(
                    DependencyChangeKind::DependencyUpdate,
                    "org.lib",
                    "api",
                    "1.0",
                    "1.2"
                ),
                VersionChange::dependency(
                    DependencyChangeKind::PluginUpdate,
                    "org.plugins",
                    "compiler",
                    "3.0",
                    "3.1"
                ),
            ]
        );
    }

    #[rstest]
    #[case::newer_version(Some("1.0"), Some("1.2"), true)]
    #[case::already_newest(Some("1.2"), Some("1.2"), false)]
    #[case::no_update(Some("1.2"), None, false)]
    #[case::undeclared_version(None, Some("1.2"), false)]
    fn dependency_update_records_only_real_changes(
        #[case] declared: Option<&str>,
        #[case] newest: Option<&str>,
        #[case] expected: bool,
    ) {
        let update = DependencyUpdate {
            kind: DependencyChangeKind::DependencyManagementUpdate,
            coordinate: Coordinate::new("org.lib", "api", declared),
            newest: newest.map(ArtifactVersion::new),
        };

        assert_eq!(update.change().is_some(), expected);
    }

    #[tokio::test]
    async fn property_updates_record_changed_properties() {
        let mut recorder = JsonRecorder::new("update-properties");
        let options = PropertyUpdateOptions {
            upper_bound_segment: Some(Segment::Major),
            ..PropertyUpdateOptions::default()
        };

        let updates = property_updates(&helper(), &project(), &[], options, &mut recorder)
            .await
            .unwrap();

        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].newest.as_ref().map(ArtifactVersion::as_str), Some("1.2"));
        assert_eq!(
            recorder.changes(),
            &[VersionChange::property("lib.version", "1.0", "1.2")]
        );
    }

    #[tokio::test]
    async fn property_without_update_records_nothing() {
        let mut recorder = JsonRecorder::new("update-properties");
        let mut project = project();
        project.properties.insert("lib.version".to_string(), "2.0".to_string());

        let updates = property_updates(
            &helper(),
            &project,
            &[],
            PropertyUpdateOptions::default(),
            &mut recorder,
        )
        .await
        .unwrap();

        assert!(!updates[0].is_change());
        assert!(recorder.changes().is_empty());
    }
}
