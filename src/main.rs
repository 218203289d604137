use anyhow::Result;
use mentor_rust::{config, server};
use tracing::{debug, info};

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional; real environment variables win
    let dotenv_path = dotenvy::dotenv().ok();

    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.server.logs.level.clone());

    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&log_level))
        .json()
        .init();

    info!("Starting mentor server with log level: {}", log_level);
    if let Some(path) = dotenv_path {
        debug!("Loaded environment from {}", path.display());
    }
    info!(
        "Configuration loaded: model '{}', temperature {}",
        config.llm.model, config.llm.temperature
    );

    server::run(config).await?;

    Ok(())
}
