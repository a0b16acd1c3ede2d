use anyhow::Result;
use hopebites::{AppState, HopeBitesConfig, web};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = HopeBitesConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting HopeBites backend v{}", hopebites::VERSION);

    let state = AppState::new(config)?;
    web::run(state).await
}
