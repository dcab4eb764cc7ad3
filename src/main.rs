use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use versions_engine::config::{self, EngineConfig};
use versions_engine::goals::{self, DependencyUpdateOptions, PropertyUpdateOptions};
use versions_engine::logging::{Level, init_logging};
use versions_engine::project::ProjectDescriptor;
use versions_engine::recording::{VersionChangeRecorder, recorder_for};
use versions_engine::rules::loader::{RuleSetSource, load_rule_set};
use versions_engine::rules::{RuleService, RuleSet};
use versions_engine::transport::{FileTransport, HttpTransport, Transports};
use versions_engine::version::helper::VersionsHelper;
use versions_engine::version::property_versions::Property;
use versions_engine::version::resolver::VersionRangeResolver;
use versions_engine::version::resolvers::{MapResolver, MetadataResolver};
use versions_engine::version::segment::Segment;

#[derive(Parser)]
#[command(name = "versions-engine")]
#[command(version, about = "Version resolution and update checks for build descriptors")]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug messages
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file (defaults to the data directory with --verbose)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Inputs {
    /// Build descriptor (JSON)
    #[arg(long)]
    project: PathBuf,

    /// Available versions as `{"groupId:artifactId": [versions]}`; repositories are queried
    /// when omitted
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Consider snapshot versions
    #[arg(long)]
    allow_snapshots: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Report the newest update of every dependency and plugin
    DependencyUpdates {
        #[command(flatten)]
        inputs: Inputs,

        /// Most major segment allowed to change (major, minor, incremental, subincremental)
        #[arg(long)]
        scope: Option<Segment>,
    },
    /// Report and record the newest value of every version property
    PropertyUpdates {
        #[command(flatten)]
        inputs: Inputs,

        /// Property definitions (JSON array)
        #[arg(long)]
        properties: Option<PathBuf>,

        /// Comma separated properties to check
        #[arg(long)]
        include_properties: Option<String>,

        /// Comma separated properties to skip
        #[arg(long)]
        exclude_properties: Option<String>,

        /// Allow the newest version to be lower than the current one
        #[arg(long)]
        allow_downgrade: bool,

        /// Most minor segment held at the current value
        #[arg(long)]
        upper_bound_segment: Option<Segment>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::Verbose
    } else {
        Level::Default
    };
    let log_file = cli.log_file.clone().or_else(|| cli.verbose.then(config::log_path));
    let _guard = init_logging(level, log_file.as_deref())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    Ok(EngineConfig::from_json(&json)?)
}

async fn build_helper(
    config: &EngineConfig,
    project: &ProjectDescriptor,
    metadata: Option<&Path>,
) -> anyhow::Result<VersionsHelper> {
    let transports = || -> anyhow::Result<Transports> {
        Ok(Transports::new(vec![
            Box::new(FileTransport),
            Box::new(HttpTransport::new(config.servers.clone())?),
        ]))
    };

    let inline = config.rules_uri.is_none().then(|| RuleSet {
        comparison_method: config.comparison_method.clone(),
        ..RuleSet::default()
    });
    let rule_set = load_rule_set(
        &transports()?,
        RuleSetSource {
            inline,
            uri: config.rules_uri.as_deref(),
            server_id: config.server_id.as_deref(),
            ignored_versions: &config.ignored_versions,
        },
    )
    .await?;

    let resolver: Arc<dyn VersionRangeResolver> = match metadata {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read metadata {}", path.display()))?;
            Arc::new(MapResolver::from_json(&json)?)
        }
        None => Arc::new(MetadataResolver::new(transports()?)),
    };

    Ok(VersionsHelper::new(
        resolver,
        RuleService::new(rule_set),
        project.repositories.clone(),
        project.plugin_repositories.clone(),
    )
    .with_parallelism(config.lookup.parallelism))
}

fn write_report(config: &EngineConfig, recorder: &dyn VersionChangeRecorder) -> anyhow::Result<()> {
    let output = config.recorder.output_file.clone().or_else(|| {
        let name = recorder.default_file_name();
        (!name.is_empty()).then(|| PathBuf::from(name))
    });
    if let Some(output) = output {
        recorder.write_report(&output)?;
        info!("Recorded changes to {}", output.display());
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref()).await?;

    match cli.command {
        Command::DependencyUpdates { inputs, scope } => {
            let project = ProjectDescriptor::load(&inputs.project).await?;
            let helper = build_helper(&config, &project, inputs.metadata.as_deref()).await?;
            let mut recorder = recorder_for(&config.recorder.format, "dependency-updates")?;
            let options = DependencyUpdateOptions {
                allow_snapshots: inputs.allow_snapshots || config.lookup.allow_snapshots,
                scope,
                use_plugin_repositories: config.lookup.use_plugin_repositories,
                use_project_repositories: config.lookup.use_project_repositories,
            };

            let updates =
                goals::dependency_updates(&helper, &project, options, recorder.as_mut()).await?;
            for update in &updates {
                let current = update.coordinate.version.as_deref().unwrap_or("-");
                match &update.newest {
                    Some(newest) => println!(
                        "{} {} -> {}",
                        update.coordinate.versionless_key(),
                        current,
                        newest
                    ),
                    None => println!("{} {} (up to date)", update.coordinate.versionless_key(), current),
                }
            }
            write_report(&config, recorder.as_ref())?;
        }
        Command::PropertyUpdates {
            inputs,
            properties,
            include_properties,
            exclude_properties,
            allow_downgrade,
            upper_bound_segment,
        } => {
            let project = ProjectDescriptor::load(&inputs.project).await?;
            let helper = build_helper(&config, &project, inputs.metadata.as_deref()).await?;
            let definitions: Vec<Property> = match properties {
                Some(path) => serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?,
                None => Vec::new(),
            };
            let mut recorder = recorder_for(&config.recorder.format, "property-updates")?;
            let options = PropertyUpdateOptions {
                allow_snapshots: inputs.allow_snapshots || config.lookup.allow_snapshots,
                allow_downgrade,
                upper_bound_segment,
                include_properties: include_properties.as_deref(),
                exclude_properties: exclude_properties.as_deref(),
            };

            let updates =
                goals::property_updates(&helper, &project, &definitions, options, recorder.as_mut())
                    .await?;
            for update in &updates {
                let current = update.property.value.as_deref().unwrap_or("-");
                match &update.newest {
                    Some(newest) if update.is_change() => {
                        println!("${{{}}} {} -> {}", update.property.name, current, newest)
                    }
                    _ => println!("${{{}}} {} (up to date)", update.property.name, current),
                }
            }

            write_report(&config, recorder.as_ref())?;
        }
    }
    Ok(())
}
