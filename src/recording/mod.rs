//! Recording of the version changes an execution applies
//!
//! Goals report each change they make to a [`VersionChangeRecorder`]; the recorder selected by
//! configuration decides whether and how the changes are written out.

mod json;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json::{ChangeRecorderLog, JsonRecorder, VersionsExecution};

pub const FORMAT_NONE: &str = "none";
pub const FORMAT_JSON: &str = "json";

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize change log: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown change recorder format: {0}")]
    UnknownFormat(String),
}

/// Where in the build descriptor a dependency change was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DependencyChangeKind {
    DependencyUpdate,
    DependencyManagementUpdate,
    PluginUpdate,
    PluginManagementUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyVersionChange {
    pub kind: DependencyChangeKind,
    pub group_id: String,
    pub artifact_id: String,
    pub old_version: String,
    pub new_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyVersionChange {
    pub property: String,
    pub old_value: String,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VersionChange {
    Dependency(DependencyVersionChange),
    Property(PropertyVersionChange),
}

impl VersionChange {
    pub fn dependency(
        kind: DependencyChangeKind,
        group_id: &str,
        artifact_id: &str,
        old_version: &str,
        new_version: &str,
    ) -> Self {
        VersionChange::Dependency(DependencyVersionChange {
            kind,
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            old_version: old_version.to_string(),
            new_version: new_version.to_string(),
        })
    }

    pub fn property(property: &str, old_value: &str, new_value: &str) -> Self {
        VersionChange::Property(PropertyVersionChange {
            property: property.to_string(),
            old_value: old_value.to_string(),
            new_value: new_value.to_string(),
        })
    }
}

pub trait VersionChangeRecorder: Send {
    fn record_change(&mut self, change: VersionChange);

    /// Writes the recorded changes to `path`
    fn write_report(&self, path: &Path) -> Result<(), RecorderError>;

    /// File name used when no output file is configured; empty if nothing is written
    fn default_file_name(&self) -> &str;
}

/// Discards every change
#[derive(Debug, Default)]
pub struct NoneRecorder;

impl VersionChangeRecorder for NoneRecorder {
    fn record_change(&mut self, _change: VersionChange) {}

    fn write_report(&self, _path: &Path) -> Result<(), RecorderError> {
        Ok(())
    }

    fn default_file_name(&self) -> &str {
        ""
    }
}

/// Creates the recorder registered under `format` for an execution of `goal`
pub fn recorder_for(format: &str, goal: &str) -> Result<Box<dyn VersionChangeRecorder>, RecorderError> {
    match format {
        FORMAT_NONE => Ok(Box::new(NoneRecorder)),
        FORMAT_JSON => Ok(Box::new(JsonRecorder::new(goal))),
        other => Err(RecorderError::UnknownFormat(other.to_string())),
    }
}
