use std::cmp::Ordering;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pkg_capabilities::StaticLookup;
use pkg_constants::network::DEFAULT_SERVER_URL;
use pkg_quota::Quantity;
use pkg_types::admission::{ValidationRequest, ValidationResponse};
use pkg_types::project::Project;
use tracing::info;

#[derive(Parser)]
#[command(name = "rpqctl", about = "CLI tool for Rancher project quota admission")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a ValidationRequest, offline or against a running server
    Eval {
        /// ValidationRequest file (JSON or YAML)
        #[arg(long)]
        request: String,

        /// Project files used to answer lookups offline
        #[arg(long)]
        project: Vec<String>,

        /// Send the request to an rpq-server instead of evaluating locally
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_SERVER_URL)]
        server: Option<String>,
    },
    /// Compare two quantities
    Compare { a: String, b: String },
    /// Print what is left of a limit once `used` is taken out
    Available { limit: String, used: String },
}

/// Read a JSON or YAML document. JSON is accepted by the YAML parser as is.
fn load_document<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path))
}

fn evaluate_offline(
    request: &ValidationRequest,
    project_files: &[String],
) -> anyhow::Result<ValidationResponse> {
    let mut lookup = StaticLookup::new();
    for path in project_files {
        let project: Project = load_document(path)?;
        lookup
            .insert_project(&project)
            .with_context(|| format!("Cannot register Project from {}", path))?;
    }
    info!("Evaluating offline with {} Project(s)", lookup.len());
    Ok(pkg_policy::validate_request(&request.request, &lookup))
}

async fn evaluate_remote(
    request: &ValidationRequest,
    server: &str,
) -> anyhow::Result<ValidationResponse> {
    let url = format!("{}/validate", server.trim_end_matches('/'));
    info!("Posting request to {}", url);
    let resp = reqwest::Client::new().post(&url).json(request).send().await?;

    if !resp.status().is_success() {
        anyhow::bail!("server returned {}", resp.status());
    }
    Ok(resp.json().await?)
}

fn print_decision(decision: &ValidationResponse) {
    if decision.accepted {
        println!("ACCEPTED");
        return;
    }
    match decision.code {
        Some(code) => println!("REJECTED (code {})", code),
        None => println!("REJECTED"),
    }
    if let Some(message) = &decision.message {
        println!("  {}", message);
    }
}

fn parse_quantity(raw: &str) -> anyhow::Result<Quantity> {
    Quantity::parse(raw).with_context(|| format!("Invalid quantity {:?}", raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Eval {
            request,
            project,
            server,
        } => {
            let req: ValidationRequest = load_document(request)?;
            let decision = match server {
                Some(server) => evaluate_remote(&req, server).await?,
                None => evaluate_offline(&req, project)?,
            };
            print_decision(&decision);
            if !decision.accepted {
                std::process::exit(1);
            }
        }
        Commands::Compare { a, b } => {
            let qa = parse_quantity(a)?;
            let qb = parse_quantity(b)?;
            let sign = match qa.cmp(&qb) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            println!("{} {} {}", qa, sign, qb);
        }
        Commands::Available { limit, used } => {
            let available = parse_quantity(limit)? - parse_quantity(used)?;
            println!("{}", available);
        }
    }

    Ok(())
}
