//! CEP weather services.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client                 input service               weather service
//!   ──────  POST / ──────▶ ┌──────────────┐  GET /weather ┌──────────────┐
//!                          │ relay        │ ────────────▶ │ enrichment   │──▶ ViaCEP
//!                          │ (normalizing │  traceparent  │ (strict CEP) │──▶ WeatherAPI
//!   ◀──── status + body ── │  CEP check)  │ ◀──────────── │              │
//!                          └──────────────┘   verbatim    └──────────────┘
//! ```
//!
//! One binary, one service per process: `cep-weather api` or `cep-weather input`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::net::TcpListener;

use cep_weather::config::resolve_config;
use cep_weather::enrichment::EnrichmentState;
use cep_weather::http::{enrichment_router, relay_router, HttpServer};
use cep_weather::lifecycle::{wait_for_signal, Shutdown};
use cep_weather::observability::{init_telemetry, metrics};
use cep_weather::relay::{EnrichmentClient, RelayState};

#[derive(Parser)]
#[command(name = "cep-weather", version)]
#[command(about = "Postal code to weather services", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; environment variables override it.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run the weather service (GET /weather?cep=)
    Api,
    /// Run the input service (POST /)
    Input,
}

impl Commands {
    fn service_name(self) -> &'static str {
        match self {
            Commands::Api => "weather-api",
            Commands::Input => "weather-input",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let service = cli.command.service_name();

    let mut config = resolve_config(cli.config.as_deref())?;
    if config.observability.service_name.is_empty() {
        config.observability.service_name = service.to_string();
    }

    let telemetry = init_telemetry(&config.observability)?;

    tracing::info!(service, version = env!("CARGO_PKG_VERSION"), "cep-weather starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let client = reqwest::Client::new();
    let router = match cli.command {
        Commands::Api => {
            if config.enrichment.weather_api_key.is_empty() {
                tracing::warn!("WEATHER_API_KEY is not set; weather lookups will be rejected upstream");
            }
            tracing::info!(
                viacep = %config.enrichment.viacep_base_url,
                weather_api = %config.enrichment.weather_api_base_url,
                "Configuration loaded"
            );
            enrichment_router(EnrichmentState::from_config(&config.enrichment, client))
        }
        Commands::Input => {
            tracing::info!(downstream = %config.relay.downstream_url, "Configuration loaded");
            relay_router(RelayState::new(EnrichmentClient::new(
                client,
                config.relay.downstream_url.as_str(),
            )))
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        signal_shutdown.trigger();
    });

    HttpServer::new(service, router)
        .run(listener, shutdown.subscribe())
        .await?;

    telemetry.shutdown();
    tracing::info!("Shutdown complete");
    Ok(())
}
