pub mod config;
pub mod goals;
pub mod logging;
pub mod project;
pub mod recording;
pub mod rules;
pub mod transport;
pub mod version;
