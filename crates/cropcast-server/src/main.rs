use std::sync::Arc;

use anyhow::Result;
use cropcast_config::ServerConfig;
use cropcast_model::Predictor;
use cropcast_server::{router, ServerState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = ServerConfig::from_env()?;
    let model_path = config.model_path.clone();

    // Fitting the placeholder is CPU-bound; keep it off the async workers.
    let predictor =
        tokio::task::spawn_blocking(move || Predictor::load_or_placeholder(&model_path)).await??;
    info!(
        "Serving {} model with crops: {}",
        predictor.status().as_str(),
        predictor.crops().names().join(", ")
    );

    let app = router(Arc::new(ServerState::new(predictor)));

    let addr = config.addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
