//! Resolver reading `maven-metadata.xml` from repository layouts

use std::io::ErrorKind;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::transport::{TransportError, Transports};
use crate::version::error::ResolverError;
use crate::version::resolver::{Repository, VersionRangeResolver, filter_by_constraint};
use crate::version::types::Coordinate;

/// Lists versions from the artifact-level metadata file of each repository
pub struct MetadataResolver {
    transports: Transports,
}

impl MetadataResolver {
    pub fn new(transports: Transports) -> Self {
        Self { transports }
    }

    fn metadata_uri(repository: &Repository, coordinate: &Coordinate) -> String {
        format!(
            "{}/{}/{}/maven-metadata.xml",
            repository.url.trim_end_matches('/'),
            coordinate.group_id.replace('.', "/"),
            coordinate.artifact_id
        )
    }
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|child| child.is_element() && child.tag_name().name() == tag)
}

/// Extracts the `metadata/versioning/versions/version` entries of a metadata document
pub fn parse_metadata_versions(xml: &str) -> Result<Vec<String>, ResolverError> {
    let document = Document::parse(xml)
        .map_err(|e| ResolverError::InvalidResponse(format!("malformed metadata: {e}")))?;
    let root = document.root_element();
    if !root.has_tag_name("metadata") {
        return Err(ResolverError::InvalidResponse(format!(
            "unexpected root element <{}>",
            root.tag_name().name()
        )));
    }

    let Some(versions) = child(root, "versioning").and_then(|versioning| child(versioning, "versions"))
    else {
        return Ok(Vec::new());
    };
    Ok(versions
        .children()
        .filter(|node| node.is_element() && node.has_tag_name("version"))
        .filter_map(|node| node.text())
        .map(str::trim)
        .filter(|version| !version.is_empty())
        .map(str::to_string)
        .collect())
}

fn is_missing(error: &TransportError) -> bool {
    match error {
        TransportError::Status { status: 404, .. } => true,
        TransportError::Io(e) => e.kind() == ErrorKind::NotFound,
        _ => false,
    }
}

#[async_trait::async_trait]
impl VersionRangeResolver for MetadataResolver {
    async fn resolve_version_range(
        &self,
        coordinate: &Coordinate,
        constraint: &str,
        repositories: &[Repository],
    ) -> Result<Vec<String>, ResolverError> {
        let mut versions: Vec<String> = Vec::new();

        for repository in repositories {
            let uri = Self::metadata_uri(repository, coordinate);
            let xml = match self.transports.download(&uri, Some(&repository.id)).await {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(e) if is_missing(&e) => {
                    debug!("{} not found in {}", coordinate.versionless_key(), repository.id);
                    continue;
                }
                Err(e) => {
                    warn!("Failed to read {}: {}", uri, e);
                    return Err(ResolverError::Network(e.to_string()));
                }
            };

            for version in parse_metadata_versions(&xml)? {
                if !versions.contains(&version) {
                    versions.push(version);
                }
            }
        }

        filter_by_constraint(versions, constraint)
    }
}
