/// Version injected at compile time via ATLAS_K8S_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ATLAS_K8S_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use atlas_k8s::apply::{Applier, DirectoryCluster};
use atlas_k8s::capability::{
    registry, CapabilitySet, DirSchemaProvider, HttpSchemaProvider, SchemaProvider, Version,
};
use atlas_k8s::cloud::{SnapshotProvider, StaticCredentials};
use atlas_k8s::config::Config;
use atlas_k8s::exporter::{serialize, ExportOptions, Exporter};
use atlas_k8s::patcher::SchemaPatcher;
use atlas_k8s::resources::TargetObject;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Export MongoDB Atlas projects as Atlas Kubernetes Operator resources
#[derive(Parser, Debug)]
#[command(name = "atlas-k8s", version, about, long_about = None)]
struct Args {
    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the project's resources as a YAML stream
    Generate {
        #[command(flatten)]
        export: ExportArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Create the project's resources, in dependency order, as manifest files
    Apply {
        #[command(flatten)]
        export: ExportArgs,

        /// Directory receiving one manifest per created object
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// List the operator versions this build knows about
    Versions,
    /// Persist defaults used when the matching flag is not given
    Config {
        #[arg(long)]
        namespace: Option<String>,

        #[arg(long)]
        operator_version: Option<String>,

        #[arg(long)]
        schema_base_url: Option<String>,

        #[arg(long)]
        schema_dir: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug)]
struct ExportArgs {
    /// JSON dump of the Atlas state to export from
    #[arg(long)]
    snapshot: PathBuf,

    /// Atlas project id
    #[arg(long)]
    project_id: String,

    /// Organization the project must belong to
    #[arg(long)]
    org_id: Option<String>,

    /// Namespace of the generated objects
    #[arg(short, long)]
    namespace: Option<String>,

    /// Target Atlas Kubernetes Operator version
    #[arg(long)]
    operator_version: Option<String>,

    /// Fill secret values instead of leaving them empty
    #[arg(long)]
    include_secrets: bool,

    /// Reference the project by Atlas id where the operator allows it
    #[arg(long)]
    independent: bool,

    /// Only export these deployments (repeatable)
    #[arg(long = "cluster-name")]
    cluster_names: Vec<String>,

    /// Only export these data federations (repeatable)
    #[arg(long = "data-federation-name")]
    data_federation_names: Vec<String>,

    /// Read CRDs from this directory instead of downloading them
    #[arg(long)]
    schema_dir: Option<PathBuf>,

    /// Base URL CRDs are downloaded from
    #[arg(long)]
    schema_base_url: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Failed to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("atlas-k8s {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("atlas-k8s").join("atlas-k8s.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".atlas-k8s").join("atlas-k8s.log");
    }
    PathBuf::from("atlas-k8s.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);
    let mut config = Config::load();

    match args.command {
        Command::Generate { export, output } => {
            let objects = export_objects(&config, &export).await?;
            let yaml = serialize(&objects)?;
            match output {
                Some(path) => std::fs::write(&path, yaml)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => print!("{}", yaml),
            }
        }
        Command::Apply { export, out_dir } => {
            let objects = export_objects(&config, &export).await?;
            let cluster = DirectoryCluster::open(&out_dir).await?;
            let report = Applier::new(&cluster).apply(objects).await?;
            println!(
                "Created {} object(s) in {}",
                report.created.len(),
                out_dir.display()
            );
        }
        Command::Versions => {
            for entry in registry().versions() {
                let kinds: Vec<&str> = entry.kinds.iter().map(|k| k.kind_name()).collect();
                println!("{}\t{}", entry.version, kinds.join(", "));
            }
        }
        Command::Config {
            namespace,
            operator_version,
            schema_base_url,
            schema_dir,
        } => {
            if let Some(version) = &operator_version {
                registry().lookup(version)?;
            }
            config.namespace = namespace.or(config.namespace);
            config.operator_version = operator_version.or(config.operator_version);
            config.schema_base_url = schema_base_url.or(config.schema_base_url);
            config.schema_dir = schema_dir.or(config.schema_dir);
            config.save()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn schema_provider(config: &Config, args: &ExportArgs) -> Result<Box<dyn SchemaProvider>> {
    if let Some(dir) = config.effective_schema_dir(args.schema_dir.as_deref()) {
        tracing::info!("Reading CRDs from {:?}", dir);
        return Ok(Box::new(DirSchemaProvider::new(dir)));
    }
    let base = config.effective_schema_base_url(args.schema_base_url.as_deref());
    tracing::info!("Downloading CRDs from {}", base);
    Ok(Box::new(HttpSchemaProvider::new(&base)?))
}

async fn export_objects(config: &Config, args: &ExportArgs) -> Result<Vec<TargetObject>> {
    let requested = config.effective_operator_version(args.operator_version.as_deref());
    let compatible = registry().compatible_version(&requested)?;
    if Version::parse(&requested).map(Version::major_minor) != Some(compatible) {
        tracing::warn!("Operator version {} is newer than known, using {}", requested, compatible);
    }
    let version = compatible.to_string();
    let schemas = schema_provider(config, args)?;
    let capabilities = CapabilitySet::load(schemas.as_ref(), &version).await?;

    let cloud = SnapshotProvider::from_file(&args.snapshot)?;
    let credentials = StaticCredentials::from_env();
    let options = ExportOptions {
        project_id: args.project_id.clone(),
        org_id: args.org_id.clone(),
        namespace: config.effective_namespace(args.namespace.as_deref()),
        include_secrets: args.include_secrets,
        independent: args.independent,
        cluster_names: args.cluster_names.clone(),
        data_federation_names: args.data_federation_names.clone(),
    };

    let objects = Exporter::new(&cloud, &credentials, &capabilities, options)
        .with_patcher(SchemaPatcher::new(&capabilities))
        .export()
        .await?;
    tracing::info!("Exported {} object(s)", objects.len());
    Ok(objects)
}
