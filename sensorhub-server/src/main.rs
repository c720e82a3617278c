use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use sensorhub_server::{
    AppState, api,
    config::{Config, RegistryConfig},
    registry::{ReadingRegistry, memory::InMemoryReadingRegistry, sqlite::SqliteReadingRegistry},
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "sensorhub-server")]
#[command(about = "SensorHub reading ingestion and query server")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sensorhub-server.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,sensorhub_server=info,tower_http=info".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    info!(
        http_addr = %config.server.http_addr,
        query_limit = config.query.limit,
        "Starting sensorhub-server"
    );

    match config.registry {
        RegistryConfig::Memory => {
            info!("Using in-memory registry");
            let registry = InMemoryReadingRegistry::new();
            run_server(Some(registry), config.server.http_addr, config.query.limit).await?;
        }
        RegistryConfig::Sqlite { path } => {
            info!(path = ?path, "Using SQLite registry");
            // A registry that fails to open leaves the data endpoints
            // answering 503 instead of taking the server down.
            let registry = match SqliteReadingRegistry::new(path.to_string_lossy()).await {
                Ok(registry) => Some(registry),
                Err(e) => {
                    error!(error = %e, path = ?path, "failed to open reading registry");
                    warn!("data endpoints will report the database as unavailable");
                    None
                }
            };
            run_server(registry, config.server.http_addr, config.query.limit).await?;
        }
    }

    Ok(())
}

async fn run_server<R>(
    registry: Option<R>,
    http_addr: SocketAddr,
    query_limit: usize,
) -> color_eyre::Result<()>
where
    R: ReadingRegistry,
{
    let state = AppState::new(registry, query_limit);
    let app = api::router(state);

    let cancel = CancellationToken::new();

    let listener = TcpListener::bind(http_addr).await?;
    info!(%http_addr, "HTTP server listening");

    let cancel_clone = cancel.clone();
    tokio::select! {
        result = axum::serve(listener, app).with_graceful_shutdown(async move {
            cancel_clone.cancelled().await;
        }) => {
            if let Err(e) = result {
                error!(error = ?e, "HTTP server error");
            }
            info!("HTTP server shut down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            cancel.cancel();
        }
    }

    Ok(())
}
