//! semroute entry point.
//!
//! Initialises logging, reads configuration from the environment, and serves
//! the routing engine over HTTP.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use semroute::config::AppConfig;

#[derive(Debug, Parser)]
#[command(name = "semroute", version, about = "Semantic prompt-routing engine")]
struct Cli {
    /// Log level when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Override the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --log-level CLI arg > "info".
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| cli.log_level.clone());
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)))
        .init();

    let mut config = AppConfig::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    semroute::app::run(config).await
}
