//! Version layer: parsing, ordering, ranges and lookups
//!
//! This module turns raw version strings into ordered version sets and answers update queries
//! against them: the newest version within a range, the updates that keep a segment fixed, or
//! the newest value a build property may take.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │  Resolver   │────▶│   Helper    │────▶│ ArtifactVersions │
//! │  (fetch)    │     │  (lookups)  │     │ PropertyVersions │
//! └─────────────┘     └─────────────┘     └──────────────────┘
//!        │                   │                     │
//!        ▼                   ▼                     ▼
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────────┐
//! │  Resolvers  │     │ RuleService │     │    Comparator    │
//! │ (map, xml)  │     │  (rules)    │     │ (maven, numeric, │
//! └─────────────┘     └─────────────┘     │     mercury)     │
//!                                         └──────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`artifact_version`]: parsed version strings with Maven field accessors
//! - [`comparable`]: Maven item-list ordering of version strings
//! - [`segment`]: version segments used to hold parts of a version fixed
//! - [`bound`]: segment-bounded sentinels used as restriction bounds
//! - [`comparator`] / [`comparators`]: the comparison strategies
//! - [`range`]: version ranges and restrictions
//! - [`details`]: queries shared by every version set
//! - [`artifact_versions`]: versions of one artifact
//! - [`property_versions`]: versions of a build property shared by several artifacts
//! - [`resolver`] / [`resolvers`]: listing available versions
//! - [`helper`]: lookup orchestration
//! - [`error`]: error types of the version layer
//! - [`types`]: common types like `Coordinate`

pub mod artifact_version;
pub mod artifact_versions;
pub mod bound;
pub mod comparable;
pub mod comparator;
pub mod comparators;
pub mod details;
pub mod error;
pub mod helper;
pub mod property_versions;
pub mod range;
pub mod resolver;
pub mod resolvers;
pub mod segment;
pub mod types;
