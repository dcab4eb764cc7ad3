//! Per-artifact version rules
//!
//! A [`RuleSet`] maps wildcard `groupId`/`artifactId` patterns to a comparison method and a
//! list of ignored versions. The [`RuleService`] picks the best fitting rule for a coordinate
//! and caches the answer for the lifetime of the service.
//!
//! - [`model`]: serde model of the rule-set descriptor
//! - [`wildcard`]: `*`/`?` pattern matching and specificity scoring
//! - [`ignore`]: ignore-version entry validation and matching
//! - [`service`]: best-fit rule selection
//! - [`loader`]: loading a rule set from inline configuration or a URI

pub mod ignore;
pub mod loader;
pub mod model;
pub mod service;
pub mod wildcard;

use thiserror::Error;

use crate::transport::TransportError;

pub use model::{IgnoreVersion, Rule, RuleSet};
pub use service::RuleService;

#[derive(Debug, Error)]
pub enum RulesError {
    #[error("Failed to fetch rules: {0}")]
    Transport(#[from] TransportError),

    #[error("Failed to parse rules from {uri}: {source}")]
    Parse {
        uri: String,
        #[source]
        source: serde_json::Error,
    },
}
