use std::path::Path;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Show warnings and errors by default (overridable by `RUST_LOG`)
    #[default]
    Default,
    /// Show debug messages by default (overridable by `RUST_LOG`)
    Verbose,
}

impl Level {
    fn default_directive(self) -> LevelFilter {
        match self {
            Level::Default => LevelFilter::WARN,
            Level::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// Installs the global subscriber: stderr always, plus `log_file` when given.
///
/// The returned guard flushes the file writer on drop and must be held until exit.
pub fn init_logging(level: Level, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::builder()
        .with_default_directive(level.default_directive().into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(level == Level::Verbose)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(directory)?;
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;
    Ok(guard)
}
