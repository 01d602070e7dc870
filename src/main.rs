//! korea-weather MCP server entry point
//!
//! Runs the MCP server over stdio for integration with AI assistants.

use anyhow::{Context, Result};
use argh::FromArgs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use korea_weather::{KmaClient, WeatherConfig, WeatherServer};

/// KMA ultra-short-term nowcast MCP server
#[derive(FromArgs)]
struct Args {
    /// path to a TOML configuration file
    #[argh(option)]
    config: Option<PathBuf>,

    /// log level override (error, warn, info, debug, trace)
    #[argh(option)]
    log_level: Option<String>,
}

/// Install the stderr subscriber; `RUST_LOG` takes precedence over the configured level
fn init_tracing(config: &WeatherConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format == "compact" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let mut config =
        WeatherConfig::load_from_path(args.config).context("Failed to load configuration")?;
    if let Some(level) = args.log_level {
        config.log_level = level;
        config.validate()?;
    }

    init_tracing(&config);

    info!("Starting korea-weather MCP server v{}", korea_weather::VERSION);
    info!("Upstream: {}", config.base_url);
    if config.api_key().is_err() {
        tracing::warn!("KOREA_WEATHER_API_KEY is not set; weather lookups will report an error");
    }

    let client = KmaClient::new(config.clone()).context("Failed to create KMA client")?;
    let server = WeatherServer::new(config, client);

    server.run_stdio().await?;

    Ok(())
}
