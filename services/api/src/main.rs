use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::{
    build_state,
    config::{AppConfig, validate_config},
    routes,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    validate_config(&config)?;
    info!("Starting API service");

    let address = config.bind_address();
    let app_state = build_state(config).await?;
    info!("API service initialized successfully");

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&address).await?;
    info!("API service listening on {}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
