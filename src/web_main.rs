//! Admin web server entry point.

use std::path::PathBuf;

use clap::Parser;

use lexicat::config::AppConfig;
use lexicat::registry::default_registry;
use lexicat::web::{WebConfig, WebServer};
use lexicat::Reconciler;

#[derive(Parser)]
#[command(name = "lexicat-web", version, about = "Admin API for the catalog translation store")]
struct Cli {
    /// Address to bind.
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = 7080)]
    port: u16,

    /// Configuration file (defaults to the standard search paths).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };
    config.validate()?;

    let registry = default_registry(&config)?;
    let reconciler = Reconciler::new(config, registry);

    let server = WebServer::new(
        WebConfig {
            bind_addr: cli.bind,
            port: cli.port,
        },
        reconciler,
    );
    server.start().await?;

    Ok(())
}
