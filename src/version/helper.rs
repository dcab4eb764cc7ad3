//! Lookup orchestration
//!
//! [`VersionsHelper`] ties the version resolver, the rule service and the repository lists of a
//! build together: it looks up the versions of single artifacts, runs batched update lookups
//! with bounded parallelism and assembles the version sets of build properties.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use futures::{StreamExt, TryStreamExt, stream};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::config::LOOKUP_PARALLELISM;
use crate::project::{Plugin, ProjectDescriptor};
use crate::rules::RuleService;
use crate::version::artifact_version::ArtifactVersion;
use crate::version::artifact_versions::ArtifactVersions;
use crate::version::comparator::VersionComparator;
use crate::version::details::VersionDetails;
use crate::version::error::VersionRetrievalError;
use crate::version::property_versions::{
    ArtifactAssociation, Property, PropertyVersions, PropertyVersionsBuilder,
};
use crate::version::range::VersionRange;
use crate::version::resolver::{ANY_VERSION, Repository, VersionRangeResolver};
use crate::version::types::Coordinate;

/// Versions of a plugin together with updates of the plugin's own dependencies
#[derive(Debug, Clone)]
pub struct PluginUpdatesDetails {
    artifact_versions: ArtifactVersions,
    dependency_versions: BTreeMap<Coordinate, ArtifactVersions>,
    include_snapshots: bool,
}

impl PluginUpdatesDetails {
    pub fn new(
        artifact_versions: ArtifactVersions,
        dependency_versions: BTreeMap<Coordinate, ArtifactVersions>,
        include_snapshots: bool,
    ) -> Self {
        Self {
            artifact_versions,
            dependency_versions,
            include_snapshots,
        }
    }

    /// Updates of the plugin itself
    pub fn artifact_versions(&self) -> &ArtifactVersions {
        &self.artifact_versions
    }

    pub fn dependency_versions(&self) -> &BTreeMap<Coordinate, ArtifactVersions> {
        &self.dependency_versions
    }

    pub fn is_artifact_update_available(&self) -> bool {
        !self.artifact_versions.versions(self.include_snapshots).is_empty()
    }

    pub fn is_dependency_update_available(&self) -> bool {
        self.dependency_versions
            .values()
            .any(|versions| !versions.versions(self.include_snapshots).is_empty())
    }
}

/// Inputs of [`VersionsHelper::get_version_properties_map`]
#[derive(Debug, Clone, Copy)]
pub struct VersionPropertiesMapRequest<'a> {
    pub project: &'a ProjectDescriptor,
    /// Explicitly configured properties
    pub property_definitions: &'a [Property],
    /// Comma separated names; when set only these properties are kept
    pub include_properties: Option<&'a str>,
    /// Comma separated names of properties to drop
    pub exclude_properties: Option<&'a str>,
    /// Link properties to the artifacts whose versions reference them
    pub auto_link_items: bool,
}

impl<'a> VersionPropertiesMapRequest<'a> {
    pub fn new(project: &'a ProjectDescriptor) -> Self {
        Self {
            project,
            property_definitions: &[],
            include_properties: None,
            exclude_properties: None,
            auto_link_items: true,
        }
    }
}

fn property_list(names: Option<&str>) -> Vec<&str> {
    names
        .map(|names| names.split(',').map(str::trim).collect())
        .unwrap_or_default()
}

pub struct VersionsHelper {
    resolver: Arc<dyn VersionRangeResolver>,
    rule_service: RuleService,
    project_repositories: Vec<Repository>,
    plugin_repositories: Vec<Repository>,
    parallelism: usize,
}

impl VersionsHelper {
    pub fn new(
        resolver: Arc<dyn VersionRangeResolver>,
        rule_service: RuleService,
        project_repositories: Vec<Repository>,
        plugin_repositories: Vec<Repository>,
    ) -> Self {
        Self {
            resolver,
            rule_service,
            project_repositories,
            plugin_repositories,
            parallelism: LOOKUP_PARALLELISM,
        }
    }

    /// Maximum number of lookups in flight during batched lookups
    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    pub fn rule_service(&self) -> &RuleService {
        &self.rule_service
    }

    pub fn version_comparator(&self, group_id: &str, artifact_id: &str) -> VersionComparator {
        self.rule_service.version_comparator(group_id, artifact_id)
    }

    /// Repositories consulted for a lookup; project repositories come first when both are used
    pub fn repositories(
        &self,
        use_plugin_repositories: bool,
        use_project_repositories: bool,
    ) -> Vec<Repository> {
        match (use_plugin_repositories, use_project_repositories) {
            (true, false) => self.plugin_repositories.clone(),
            (false, true) => self.project_repositories.clone(),
            (true, true) => {
                let mut repositories = self.project_repositories.clone();
                for repository in &self.plugin_repositories {
                    if !repositories.contains(repository) {
                        repositories.push(repository.clone());
                    }
                }
                repositories
            }
            (false, false) => Vec::new(),
        }
    }

    /// Every version of `coordinate` the selected repositories offer, minus ignored ones.
    ///
    /// Only the first restriction of `range` narrows the query; without a range every
    /// version is requested.
    pub async fn lookup_artifact_versions(
        &self,
        coordinate: &Coordinate,
        range: Option<&VersionRange>,
        use_plugin_repositories: bool,
        use_project_repositories: bool,
    ) -> Result<ArtifactVersions, VersionRetrievalError> {
        let ignored = self.rule_service.ignore_filter(coordinate);
        if !ignored.is_empty() {
            debug!("Found ignored versions {:?} for {}", ignored, coordinate);
        }

        let constraint = range
            .and_then(|range| range.restrictions().first())
            .map(ToString::to_string)
            .unwrap_or_else(|| ANY_VERSION.to_string());
        let repositories = self.repositories(use_plugin_repositories, use_project_repositories);

        let versions = self
            .resolver
            .resolve_version_range(coordinate, &constraint, &repositories)
            .await
            .map_err(|source| VersionRetrievalError {
                coordinate: coordinate.clone(),
                source,
            })?;

        let versions = versions.into_iter().filter(|version| {
            let ignore = ignored.is_ignored(version);
            if ignore {
                debug!("Ignoring version {} of {}", version, coordinate);
            }
            !ignore
        });
        let comparator = self.version_comparator(&coordinate.group_id, &coordinate.artifact_id);
        Ok(ArtifactVersions::new(
            coordinate.clone(),
            versions.map(|version| ArtifactVersion::new(&version)),
            comparator,
        ))
    }

    /// Versions newer than the dependency's declared version
    pub async fn lookup_dependency_updates(
        &self,
        dependency: &Coordinate,
        use_plugin_repositories: bool,
        use_project_repositories: bool,
        allow_snapshots: bool,
    ) -> Result<ArtifactVersions, VersionRetrievalError> {
        let all = self
            .lookup_artifact_versions(
                dependency,
                None,
                use_plugin_repositories,
                use_project_repositories,
            )
            .await?;
        Ok(updates_only(&all, allow_snapshots))
    }

    /// Updates of every dependency, looked up concurrently.
    ///
    /// # Errors
    /// The first failed lookup aborts the batch and is returned.
    pub async fn lookup_dependencies_updates(
        &self,
        dependencies: impl IntoIterator<Item = Coordinate>,
        use_plugin_repositories: bool,
        use_project_repositories: bool,
        allow_snapshots: bool,
    ) -> Result<BTreeMap<Coordinate, ArtifactVersions>, VersionRetrievalError> {
        let updates: BTreeMap<Coordinate, ArtifactVersions> = stream::iter(dependencies)
            .map(|dependency| async move {
                let updates = self
                    .lookup_dependency_updates(
                        &dependency,
                        use_plugin_repositories,
                        use_project_repositories,
                        allow_snapshots,
                    )
                    .await?;
                Ok::<_, VersionRetrievalError>((dependency, updates))
            })
            .buffer_unordered(self.parallelism)
            .try_collect()
            .await?;

        info!("Looked up updates of {} dependencies", updates.len());
        Ok(updates)
    }

    /// Updates of a plugin from the plugin repositories and of its dependencies from the
    /// project repositories. A plugin without a version is compared against nothing, so every
    /// version is an update.
    pub async fn lookup_plugin_updates(
        &self,
        plugin: &Plugin,
        allow_snapshots: bool,
    ) -> Result<PluginUpdatesDetails, VersionRetrievalError> {
        let dependency_versions = self
            .lookup_dependencies_updates(plugin.dependencies.iter().cloned(), false, true, allow_snapshots)
            .await?;

        let all = self
            .lookup_artifact_versions(&plugin.coordinate(), None, true, false)
            .await?;
        Ok(PluginUpdatesDetails::new(
            updates_only(&all, allow_snapshots),
            dependency_versions,
            allow_snapshots,
        ))
    }

    /// Updates of every plugin, looked up concurrently
    pub async fn lookup_plugins_updates(
        &self,
        plugins: impl IntoIterator<Item = Plugin>,
        allow_snapshots: bool,
    ) -> Result<BTreeMap<Coordinate, PluginUpdatesDetails>, VersionRetrievalError> {
        let updates: BTreeMap<Coordinate, PluginUpdatesDetails> = stream::iter(plugins)
            .map(|plugin| async move {
                let details = self.lookup_plugin_updates(&plugin, allow_snapshots).await?;
                Ok::<_, VersionRetrievalError>((plugin.coordinate(), details))
            })
            .buffer_unordered(self.parallelism)
            .try_collect()
            .await?;

        info!("Looked up updates of {} plugins", updates.len());
        Ok(updates)
    }

    /// Versions offered for every association, snapshots included
    pub async fn resolve_associated_versions(
        &self,
        associations: &BTreeSet<ArtifactAssociation>,
    ) -> Result<Vec<ArtifactVersion>, VersionRetrievalError> {
        let found = stream::iter(associations)
            .map(|association| {
                self.lookup_artifact_versions(
                    &association.coordinate,
                    None,
                    association.uses_plugin_repositories,
                    !association.uses_plugin_repositories,
                )
            })
            .buffered(self.parallelism)
            .try_collect::<Vec<_>>()
            .await?;

        let mut common: Option<Vec<ArtifactVersion>> = None;
        for versions in found {
            let offered = versions.versions(true);
            common = Some(match common {
                None => offered,
                Some(kept) => kept
                    .into_iter()
                    .filter(|version| offered.iter().any(|v| v.as_str() == version.as_str()))
                    .collect(),
            });
        }
        Ok(common.unwrap_or_default())
    }

    /// Resolves the versions of the builder's associations into a property version set
    pub async fn property_versions(
        &self,
        builder: PropertyVersionsBuilder,
    ) -> Result<PropertyVersions, VersionRetrievalError> {
        let versions = self.resolve_associated_versions(builder.associations()).await?;
        Ok(builder.build(versions, VersionComparator::Maven))
    }

    /// Property definitions paired with their version sets, in definition order followed by
    /// auto-linked properties in order of first reference.
    pub async fn get_version_properties_map(
        &self,
        request: VersionPropertiesMapRequest<'_>,
    ) -> Result<IndexMap<Property, PropertyVersions>, VersionRetrievalError> {
        let mut properties: IndexMap<String, Property> = request
            .property_definitions
            .iter()
            .map(|property| (property.name.clone(), property.clone()))
            .collect();

        let mut builders: IndexMap<String, PropertyVersionsBuilder> = IndexMap::new();
        if request.auto_link_items {
            for reference in request.project.property_references() {
                builders
                    .entry(reference.property.clone())
                    .or_insert_with(|| {
                        PropertyVersionsBuilder::new(reference.profile_id.as_deref(), &reference.property)
                    })
                    .add_association(reference.coordinate, reference.uses_plugin_repositories);
            }
            for (name, builder) in &builders {
                if !properties.contains_key(name) {
                    let inferred = builder.inferred_version_range();
                    debug!("Property ${{{}}}: adding inferred version range {:?}", name, inferred);
                    properties.insert(
                        name.clone(),
                        Property {
                            version: inferred,
                            ..Property::new(name)
                        },
                    );
                }
            }
        }

        let includes = property_list(request.include_properties);
        let excludes = property_list(request.exclude_properties);
        properties.retain(|name, _| {
            if !includes.is_empty() && !includes.contains(&name.as_str()) {
                debug!("Skipping property ${{{}}}", name);
                return false;
            }
            if excludes.contains(&name.as_str()) {
                debug!("Ignoring property ${{{}}}", name);
                return false;
            }
            true
        });

        let mut result = IndexMap::with_capacity(properties.len());
        for (name, mut property) in properties {
            let mut builder = match builders.shift_remove(&name) {
                Some(builder) if builder.is_associated() => builder,
                _ => {
                    debug!("Property ${{{}}}: not associated with any artifact", name);
                    PropertyVersionsBuilder::new(None, &name)
                }
            };
            if !property.auto_link_dependencies {
                debug!("Property ${{{}}}: removing auto-linked associations", name);
                builder.clear_associations();
            }
            for dependency in &property.dependencies {
                debug!("Property ${{{}}}: adding association to {}", name, dependency);
                builder.add_association(dependency.clone(), false);
            }
            if property.auto_link_dependencies
                && property.version.as_deref().is_none_or(str::is_empty)
                && let Some(inferred) = builder.inferred_version_range()
            {
                debug!("Property ${{{}}}: adding inferred version range {}", name, inferred);
                property.version = Some(inferred);
            }

            let current = request.project.property(&name).map(str::to_string);
            property.value = current.clone();
            let versions = self
                .property_versions(builder)
                .await?
                .with_current_version(current.as_deref());
            result.insert(property, versions);
        }
        Ok(result)
    }
}

fn updates_only(all: &ArtifactVersions, allow_snapshots: bool) -> ArtifactVersions {
    ArtifactVersions::new(
        all.coordinate().clone(),
        all.newer_versions(allow_snapshots),
        all.comparator(),
    )
}
