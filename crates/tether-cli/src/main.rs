//! Tether CLI
//!
//! Talks to a JSON-RPC style endpoint from the terminal:
//! - `versions`: list the API versions the server supports
//! - `methods`: list the server's method self-description
//! - `call`: invoke any method through one of the typed call shapes
//! - `config`: create or inspect the config file

mod output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use serde_json::Value;
use tether_rpc::{ApiClient, ClientConfig, RemoteApiError, Request, ValueKind};
use tether_types::ApiVersion;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Tether remote API client
#[derive(Parser)]
#[command(name = "tether")]
#[command(about = "Tether - typed client for JSON-RPC style remote APIs")]
#[command(version)]
#[command(after_help = "\
Examples:
  tether --endpoint http://192.168.122.1:8080/sony/camera versions
  tether methods --api-version 1.0
  tether call getAvailableIsoSpeedRate --shape primitive-capability
  tether call setShootMode --params '[\"still\"]' --shape none
  tether config init --endpoint http://192.168.122.1:8080/sony/camera
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct GlobalArgs {
    /// Endpoint URL (overrides the config file)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Config file (defaults to the platform config directory)
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_file: Option<PathBuf>,

    /// Request timeout in milliseconds (overrides the config file)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List API versions supported by the server
    Versions,

    /// List method types supported by the server
    Methods {
        /// Only list methods of this API version
        #[arg(long)]
        api_version: Option<ApiVersion>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Call a method and print the result as JSON
    Call {
        /// Method name, e.g. getShootMode
        method: String,

        /// Parameters as a JSON array (a single non-array value is sent as one parameter)
        #[arg(long)]
        params: Option<String>,

        /// API version of the method (defaults to the configured version)
        #[arg(long)]
        api_version: Option<ApiVersion>,

        /// How to read the result
        #[arg(long, value_enum, default_value_t = Shape::Primitive)]
        shape: Shape,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a config file with defaults and any given flags
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,
}

/// Call shape selected with `--shape`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Primitive,
    PrimitiveList,
    Object,
    ObjectList,
    PrimitiveCapability,
    ObjectCapability,
    None,
}

impl Shape {
    fn kind(self) -> ValueKind {
        match self {
            Shape::Object | Shape::ObjectList | Shape::ObjectCapability => ValueKind::Object,
            Shape::Primitive
            | Shape::PrimitiveList
            | Shape::PrimitiveCapability
            | Shape::None => ValueKind::Primitive,
        }
    }
}

fn setup_logging(log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tether={default_level}")));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .with_context(|| format!("Log file has no file name: {}", path.display()))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));

            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(filter)
        .init();

    Ok(guard)
}

fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "tether")
        .context("Failed to determine project directories")?;
    Ok(dirs.config_dir().join("config.json"))
}

fn config_path(global: &GlobalArgs) -> Result<PathBuf> {
    match &global.config_file {
        Some(path) => Ok(path.clone()),
        None => default_config_path(),
    }
}

/// Load the config file and apply command-line overrides.
fn load_config(global: &GlobalArgs) -> Result<ClientConfig> {
    let path = config_path(global)?;
    let mut config = ClientConfig::load(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    apply_overrides(&mut config, global);
    Ok(config)
}

fn apply_overrides(config: &mut ClientConfig, global: &GlobalArgs) {
    if let Some(endpoint) = &global.endpoint {
        config.endpoint = Some(endpoint.clone());
    }
    if let Some(timeout_ms) = global.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
}

fn connect(global: &GlobalArgs) -> Result<ApiClient> {
    let config = load_config(global)?;
    let client = ApiClient::from_config(&config).context("Failed to create client")?;
    debug!("Using endpoint {}", client.endpoint());
    Ok(client)
}

/// Parse `--params`. A non-array value becomes the only parameter.
fn parse_params(raw: Option<&str>) -> Result<Vec<Value>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let value: Value = serde_json::from_str(raw).context("--params is not valid JSON")?;
    Ok(match value {
        Value::Array(params) => params,
        other => vec![other],
    })
}

async fn run_versions(global: &GlobalArgs) -> Result<()> {
    let client = connect(global)?;
    for version in client.get_versions().await? {
        println!("{version}");
    }
    Ok(())
}

async fn run_methods(
    global: &GlobalArgs,
    api_version: Option<ApiVersion>,
    json: bool,
) -> Result<()> {
    let client = connect(global)?;
    let methods = client.get_method_types(api_version).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&methods)?);
    } else {
        print!("{}", output::method_table(&methods));
    }
    Ok(())
}

async fn run_call(
    global: &GlobalArgs,
    method: &str,
    params: Option<&str>,
    api_version: Option<ApiVersion>,
    shape: Shape,
) -> Result<()> {
    let params = parse_params(params)?;
    let client = connect(global)?;
    let request = Request::new(method)
        .with_version(api_version.unwrap_or(client.default_version()))
        .with_params(params);

    let result = call_with_shape(&client, &request, shape).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn call_with_shape(
    client: &ApiClient,
    request: &Request,
    shape: Shape,
) -> tether_rpc::Result<Value> {
    let kind = shape.kind();
    match shape {
        Shape::Primitive | Shape::Object => client.single(request, kind).await,
        Shape::PrimitiveList | Shape::ObjectList => {
            client.list(request, kind).await.map(Value::Array)
        }
        Shape::PrimitiveCapability | Shape::ObjectCapability => client
            .capability::<Value>(request, kind)
            .await
            .map(|capability| output::capability_json(&capability)),
        Shape::None => client.no_value(request).await.map(|()| Value::Null),
    }
}

fn run_config(global: &GlobalArgs, command: ConfigCommand) -> Result<()> {
    let path = config_path(global)?;
    match command {
        ConfigCommand::Init { force } => init_config(&path, global, force),
        ConfigCommand::Show => {
            let config = load_config(global)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn init_config(path: &Path, global: &GlobalArgs, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut config = ClientConfig::default();
    apply_overrides(&mut config, global);
    config
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote config to {}", path.display());
    println!("{}", path.display());
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    match cli.command {
        Commands::Versions => run_versions(global).await,
        Commands::Methods { api_version, json } => run_methods(global, api_version, json).await,
        Commands::Call {
            method,
            params,
            api_version,
            shape,
        } => run_call(global, &method, params.as_deref(), api_version, shape).await,
        Commands::Config { command } => run_config(global, command),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.global.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(remote) = e.downcast_ref::<RemoteApiError>() {
                eprintln!("Error: status {}", remote.status());
                if let Some(message) = remote.message() {
                    eprintln!("  {message}");
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
