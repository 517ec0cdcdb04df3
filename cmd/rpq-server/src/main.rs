use anyhow::Context;
use clap::Parser;
use pkg_api::AppState;
use pkg_api::server::{ServerConfig, start_server};
use pkg_capabilities::{KubeApiLookup, ResourceLookup};
use pkg_constants::network::{DEFAULT_KUBE_API_SERVER, DEFAULT_LISTEN_ADDR, DEFAULT_SERVER_PORT};
use pkg_constants::paths::{DEFAULT_SERVER_CONFIG, DEFAULT_TOKEN_FILE};
use pkg_types::config::{ServerConfigFile, load_config_file};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rpq-server",
    about = "Admission server enforcing Rancher project quotas on Namespaces"
)]
struct Cli {
    /// Path to YAML config file
    #[arg(long, short, default_value = DEFAULT_SERVER_CONFIG)]
    config: String,

    /// Port to listen on
    #[arg(long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    listen_addr: Option<IpAddr>,

    /// Kubernetes API server used to look up Projects
    #[arg(long)]
    api_server: Option<String>,

    /// Bearer token file for the Kubernetes API
    #[arg(long)]
    token_file: Option<String>,

    /// Skip TLS verification of the Kubernetes API server
    #[arg(long)]
    insecure_skip_tls_verify: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    // Load config file (returns defaults if file not found)
    let file_cfg: ServerConfigFile = load_config_file(&cli.config)?;
    info!("Config file: {}", cli.config);

    // Merge: CLI args > config file > defaults
    let port = cli.port.or(file_cfg.port).unwrap_or(DEFAULT_SERVER_PORT);
    let listen_addr = match cli.listen_addr {
        Some(addr) => addr,
        None => file_cfg
            .listen_addr
            .as_deref()
            .unwrap_or(DEFAULT_LISTEN_ADDR)
            .parse()
            .context("Invalid listen-addr")?,
    };
    let api_server = cli
        .api_server
        .or(file_cfg.api_server)
        .unwrap_or_else(|| DEFAULT_KUBE_API_SERVER.to_string());
    let token_file = cli
        .token_file
        .or(file_cfg.token_file)
        .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string());
    let insecure =
        cli.insecure_skip_tls_verify || file_cfg.insecure_skip_tls_verify.unwrap_or(false);

    info!("Starting rpq-server");
    info!("  Listen:      {}:{}", listen_addr, port);
    info!("  API server:  {}", api_server);
    info!("  Token file:  {}", token_file);

    // The blocking Kubernetes client must be created and dropped outside the
    // async runtime: `lookup` is declared before `runtime` so it outlives it.
    let lookup: Arc<dyn ResourceLookup> =
        Arc::new(KubeApiLookup::with_token_file(&api_server, &token_file, insecure)?);

    let config = ServerConfig {
        addr: SocketAddr::new(listen_addr, port),
    };
    let state = AppState::new(Arc::clone(&lookup));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    runtime.block_on(start_server(config, state))?;

    Ok(())
}
