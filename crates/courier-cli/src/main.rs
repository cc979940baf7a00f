//! courier — run an A2A agent node, or message a remote one

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use courier_a2a::client::PeerTransport;
use courier_a2a::{A2aClient, OutreachEngine};
use courier_core::{NodeConfig, OutreachConfig, ProviderConfig, select_provider};
use courier_server::{AppState, TaskExecutor, build_agent_card, serve};

#[derive(Parser)]
#[command(
    name = "courier",
    version,
    about = "An A2A agent node with autonomous peer discovery and relay"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the A2A server (also the default when no command is given)
    Serve {
        /// Bind host (defaults to COURIER_HOST, then 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (defaults to COURIER_PORT, then 8000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Send a message to a remote A2A agent and print its reply
    Send {
        /// Remote agent base URL (defaults to COURIER_REMOTE_URL)
        #[arg(long)]
        agent_url: Option<String>,
        /// Message text to send
        #[arg(long)]
        message: String,
        /// Request timeout in seconds
        #[arg(long, default_value_t = 30.0)]
        timeout: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        None => run_server(None, None).await,
        Some(Command::Serve { host, port }) => run_server(host, port).await,
        Some(Command::Send {
            agent_url,
            message,
            timeout,
        }) => send_message(agent_url, &message, timeout).await,
    }
}

async fn run_server(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut node = NodeConfig::from_env();
    if let Some(host) = host {
        node.host = host;
    }
    if let Some(port) = port {
        node.port = port;
    }

    let provider_config = ProviderConfig::from_env()?;
    let provider = select_provider(&provider_config);
    info!(
        "Using {} provider with model {}",
        provider.provider_name(),
        provider.model()
    );

    let public_url = node.public_url();
    let outreach = OutreachConfig::from_env(Some(&public_url));
    info!(
        "Outreach: self={} candidates={} max_hops={}",
        public_url,
        outreach.discovery_urls.len(),
        outreach.max_hops
    );

    let engine = OutreachEngine::new(Arc::new(A2aClient::new()), outreach);
    let state = AppState {
        card: build_agent_card(&node),
        executor: Arc::new(TaskExecutor::new(provider, engine)),
    };

    let host = node.host.clone();
    serve(state, &host, node.port).await
}

async fn send_message(agent_url: Option<String>, message: &str, timeout: f64) -> Result<()> {
    ensure!(timeout > 0.0, "--timeout must be positive");
    let agent_url = agent_url
        .or_else(|| std::env::var("COURIER_REMOTE_URL").ok())
        .context("--agent-url is required, or set COURIER_REMOTE_URL")?;

    let client = A2aClient::new();
    let reply = client
        .send_task(&agent_url, message, Duration::from_secs_f64(timeout))
        .await?;
    println!("{}", reply);
    Ok(())
}
