//! Rule-set loading

use tracing::info;

use crate::rules::RulesError;
use crate::rules::model::{IgnoreVersion, RuleSet};
use crate::transport::Transports;

/// Where the rule set of a session comes from
#[derive(Debug, Clone, Default)]
pub struct RuleSetSource<'a> {
    /// Rule set given directly in the configuration; takes precedence over `uri`
    pub inline: Option<RuleSet>,
    /// Location of a JSON rule-set descriptor
    pub uri: Option<&'a str>,
    /// Server whose credentials are used to download `uri`
    pub server_id: Option<&'a str>,
    /// Regex patterns appended to the global ignore list
    pub ignored_versions: &'a [String],
}

/// Loads the rule set of a session; without inline rules or a URI the default rule set is used
pub async fn load_rule_set(
    transports: &Transports,
    source: RuleSetSource<'_>,
) -> Result<RuleSet, RulesError> {
    let mut rule_set = match (source.inline, source.uri) {
        (Some(rule_set), _) => rule_set,
        (None, Some(uri)) if !uri.trim().is_empty() => {
            info!("Loading rules from {}", uri);
            transports
                .download_with(uri, source.server_id, |bytes| {
                    serde_json::from_slice::<RuleSet>(bytes).map_err(|source| RulesError::Parse {
                        uri: uri.to_string(),
                        source,
                    })
                })
                .await?
        }
        _ => RuleSet::default(),
    };

    rule_set.ignore_versions.extend(
        source
            .ignored_versions
            .iter()
            .map(|pattern| IgnoreVersion::regex(pattern)),
    );
    Ok(rule_set)
}
