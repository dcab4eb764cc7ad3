use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::recording::{RecorderError, VersionChange, VersionChangeRecorder};

const DEFAULT_FILE_NAME: &str = "versions-changes.json";

/// Changes recorded by one goal execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsExecution {
    pub goal: String,
    /// RFC 3339 timestamp of the execution
    pub date: String,
    pub version_changes: Vec<VersionChange>,
}

/// Contents of a change log file; executions are appended across runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeRecorderLog {
    pub updates: Vec<VersionsExecution>,
}

/// Writes changes as a pretty-printed JSON change log
#[derive(Debug)]
pub struct JsonRecorder {
    goal: String,
    date: DateTime<Utc>,
    changes: Vec<VersionChange>,
}

impl JsonRecorder {
    pub fn new(goal: &str) -> Self {
        Self::with_date(goal, Utc::now())
    }

    pub fn with_date(goal: &str, date: DateTime<Utc>) -> Self {
        Self {
            goal: goal.to_string(),
            date,
            changes: Vec::new(),
        }
    }

    pub fn changes(&self) -> &[VersionChange] {
        &self.changes
    }

    fn read_log(path: &Path) -> Result<ChangeRecorderLog, RecorderError> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(ChangeRecorderLog::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ChangeRecorderLog::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl VersionChangeRecorder for JsonRecorder {
    fn record_change(&mut self, change: VersionChange) {
        self.changes.push(change);
    }

    fn write_report(&self, path: &Path) -> Result<(), RecorderError> {
        let mut log = Self::read_log(path)?;
        log.updates.push(VersionsExecution {
            goal: self.goal.clone(),
            date: self.date.to_rfc3339_opts(SecondsFormat::Secs, true),
            version_changes: self.changes.clone(),
        });

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(&log)?)?;
        debug!(
            "Wrote {} version changes of {} to {}",
            self.changes.len(),
            self.goal,
            path.display()
        );
        Ok(())
    }

    fn default_file_name(&self) -> &str {
        DEFAULT_FILE_NAME
    }
}
