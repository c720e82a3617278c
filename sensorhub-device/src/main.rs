mod client;
mod config;
mod sensor;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};

use client::{HubClient, SendOutcome};
use config::Config;
use sensor::SensorKind;

#[derive(Parser)]
#[command(name = "sensorhub-device")]
#[command(about = "Simulated field device posting readings to sensorhub-server")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "sensorhub-device.toml")]
    config: PathBuf,

    /// Stop after this many rounds instead of running until Ctrl+C
    #[arg(long)]
    rounds: Option<u64>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,sensorhub_device=info".to_owned());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        info!(path = ?cli.config, "Loading configuration");
        Config::load(&cli.config)?
    } else {
        info!("No configuration file found, using defaults");
        Config::default()
    };

    let client = HubClient::new(config.server_url.clone());
    info!(
        url = client.url(),
        sensors = ?config.sensors,
        round_interval_secs = config.round_interval_secs,
        "Starting sensorhub-device"
    );

    // Dropping the round future on Ctrl+C abandons any in-flight send.
    tokio::select! {
        _ = run_rounds(&client, &config, cli.rounds) => {
            info!("Finished sending readings");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    Ok(())
}

async fn run_rounds(client: &HubClient, config: &Config, rounds: Option<u64>) {
    let gap = Duration::from_secs(config.sensor_gap_secs);
    let interval = Duration::from_secs(config.round_interval_secs);
    let mut round = 0u64;

    while rounds.is_none_or(|max| round < max) {
        round += 1;

        for (i, name) in config.sensors.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(gap).await;
            }
            send_reading(client, name).await;
        }

        if rounds.is_some_and(|max| round >= max) {
            break;
        }

        info!(secs = interval.as_secs(), "Waiting for next round");
        tokio::time::sleep(interval).await;
    }
}

async fn send_reading(client: &HubClient, name: &str) {
    let kind = match name.parse::<SensorKind>() {
        Ok(kind) => kind,
        Err(e) => {
            error!(sensor = %e.0, "unknown sensor type, nothing sent");
            return;
        }
    };

    let payload = kind.read(&mut rand::rng());
    info!(sensor = payload.sensor_type, value = payload.value, unit = payload.unit, "sending reading");

    match client.send(&payload).await {
        Ok(SendOutcome::Stored) => {
            info!(sensor = payload.sensor_type, "reading stored by hub");
        }
        Ok(SendOutcome::Rejected { status, body }) => {
            warn!(%status, body, sensor = payload.sensor_type, "hub rejected reading");
        }
        Err(e) => {
            warn!(error = %e, sensor = payload.sensor_type, "could not reach hub");
        }
    }
}
