use anyhow::Context;
use clap::Parser;
use evcharge_api::config::AppConfig;
use evcharge_api::{ApiState, create_app};
use evcharge_core::catalog::{load_catalog, sample_stations};
use evcharge_core::{FileStore, Station};
use std::path::{Path, PathBuf};

/// Command line arguments for the station finder host
#[derive(Parser, Debug)]
#[command(name = "evcharge")]
#[command(about = "EV charging station finder")]
struct Args {
    /// Path to the JSON configuration file; defaults apply without one
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to bind the server to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Directory favorites are stored in, overrides the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,
}

async fn read_config(path: &Path) -> anyhow::Result<AppConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

async fn read_stations(config: &AppConfig) -> anyhow::Result<Vec<Station>> {
    let Some(path) = &config.catalog_path else {
        return Ok(sample_stations());
    };
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read catalog '{}'", path.display()))?;
    let stations = load_catalog(&content)
        .with_context(|| format!("Invalid catalog '{}'", path.display()))?;
    tracing::info!(
        "Loaded {} stations from {}",
        stations.len(),
        path.display()
    );
    Ok(stations)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt().pretty().init();

    let mut config = match &args.config {
        Some(path) => {
            let config = read_config(path).await?;
            tracing::info!("Loaded config from {}", path.display());
            config
        }
        None => AppConfig::default(),
    };
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let stations = read_stations(&config).await?;
    let store = FileStore::new(config.data_dir.clone());
    tracing::info!("Storing favorites under {}", store.dir().display());

    let app = create_app(ApiState::new(&config, stations, Box::new(store)));

    let bind_addr = format!("127.0.0.1:{}", args.port);
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
