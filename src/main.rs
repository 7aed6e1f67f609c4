use anyhow::Result;
use std::sync::Arc;

use dataset_insights::{app, config, logging, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::load_config()?;
    let addr = config.bind_addr;

    // Build our application with its routes
    let app = app(Arc::new(AppState::new(config)));

    // Run it
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
