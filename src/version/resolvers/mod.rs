//! Version range resolver implementations

mod map;
mod metadata;

pub use map::MapResolver;
pub use metadata::MetadataResolver;
