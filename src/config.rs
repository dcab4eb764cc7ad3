use serde::Deserialize;
use std::path::PathBuf;

use crate::recording::FORMAT_NONE;
use crate::version::comparator::DEFAULT_COMPARISON_METHOD;

// =============================================================================
// Lookup constants
// =============================================================================

/// Maximum number of concurrent version lookups in batched operations
pub const LOOKUP_PARALLELISM: usize = 5;

/// Timeout for a single repository request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Engine configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Comparison method used when no rule names one
    pub comparison_method: String,
    /// Regular expressions of versions ignored for every artifact
    pub ignored_versions: Vec<String>,
    /// Location of a rule-set descriptor (`file:`, plain path, or `http(s):`)
    pub rules_uri: Option<String>,
    /// Server whose credentials are used to fetch `rules_uri`
    pub server_id: Option<String>,
    pub servers: Vec<ServerConfig>,
    pub lookup: LookupConfig,
    pub recorder: RecorderConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            comparison_method: DEFAULT_COMPARISON_METHOD.to_string(),
            ignored_versions: Vec::new(),
            rules_uri: None,
            server_id: None,
            servers: Vec::new(),
            lookup: LookupConfig::default(),
            recorder: RecorderConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Credentials for a repository server
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub id: String,
    pub username: String,
    pub password: Option<String>,
}

/// Lookup-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    pub parallelism: usize,
    pub allow_snapshots: bool,
    pub use_plugin_repositories: bool,
    pub use_project_repositories: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            parallelism: LOOKUP_PARALLELISM,
            allow_snapshots: false,
            use_plugin_repositories: false,
            use_project_repositories: true,
        }
    }
}

/// Change recorder configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecorderConfig {
    /// `none` or `json`
    pub format: String,
    pub output_file: Option<PathBuf>,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            format: FORMAT_NONE.to_string(),
            output_file: None,
        }
    }
}

/// Returns the path to the data directory for versions-engine.
/// Uses $XDG_DATA_HOME/versions-engine if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/versions-engine,
/// or ./versions-engine if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("versions-engine.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("versions-engine")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn engine_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<EngineConfig>(json!({
            "lookup": {
                "allowSnapshots": true
            }
        }))
        .unwrap();

        assert!(result.lookup.allow_snapshots);
        assert_eq!(result.lookup.parallelism, LOOKUP_PARALLELISM);
        assert_eq!(result.comparison_method, "maven");
        assert_eq!(result.recorder, RecorderConfig::default());
    }

    #[test]
    fn engine_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<EngineConfig>(json!({
            "comparisonMethod": "mercury",
            "ignoredVersions": [".*-beta", ".*-rc\\d+"],
            "rulesUri": "https://rules.example.com/rules.json",
            "serverId": "rules",
            "servers": [
                { "id": "rules", "username": "user", "password": "secret" }
            ],
            "lookup": {
                "parallelism": 8,
                "allowSnapshots": true,
                "usePluginRepositories": true,
                "useProjectRepositories": false
            },
            "recorder": {
                "format": "json",
                "outputFile": "target/versions-changes.json"
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            EngineConfig {
                comparison_method: "mercury".to_string(),
                ignored_versions: vec![".*-beta".to_string(), ".*-rc\\d+".to_string()],
                rules_uri: Some("https://rules.example.com/rules.json".to_string()),
                server_id: Some("rules".to_string()),
                servers: vec![ServerConfig {
                    id: "rules".to_string(),
                    username: "user".to_string(),
                    password: Some("secret".to_string()),
                }],
                lookup: LookupConfig {
                    parallelism: 8,
                    allow_snapshots: true,
                    use_plugin_repositories: true,
                    use_project_repositories: false,
                },
                recorder: RecorderConfig {
                    format: "json".to_string(),
                    output_file: Some(PathBuf::from("target/versions-changes.json")),
                },
            }
        );
    }

    #[test]
    fn data_dir_with_env_uses_xdg_data_home_when_set() {
        let path = data_dir_with_env(
            Some("/tmp/test-data".to_string()),
            Some(PathBuf::from("/home/user")),
        );

        assert_eq!(path, PathBuf::from("/tmp/test-data/versions-engine"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_home_local_share() {
        let path = data_dir_with_env(None, Some(PathBuf::from("/home/user")));

        assert_eq!(path, PathBuf::from("/home/user/.local/share/versions-engine"));
    }

    #[test]
    fn data_dir_with_env_falls_back_to_current_dir_when_no_dirs_available() {
        let path = data_dir_with_env(None, None);
        assert_eq!(path, PathBuf::from("./versions-engine"));
    }
}
