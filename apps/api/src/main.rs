mod analysis;
mod config;
mod errors;
mod llm_client;
mod models;
mod page;
mod pdf;
mod routes;
mod state;

use anyhow::{anyhow, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::controller::InteractionController;
use crate::analysis::dispatcher::InferenceDispatcher;
use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::pdf::PdftoppmConverter;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; a missing API key stops startup here.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Resume Xpert v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model client
    let gemini = GeminiClient::new(
        config.google_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )
    .map_err(|e| anyhow!("Error initializing model: {e}"))?;

    if config.verify_model_on_startup {
        gemini
            .verify_model()
            .await
            .map_err(|e| anyhow!("Error initializing model: {}: {e}", gemini.model()))?;
        info!("Model '{}' is reachable", gemini.model());
    }
    info!("LLM client initialized (model: {})", gemini.model());

    // Initialize PDF converter
    let converter = PdftoppmConverter::new(
        &config.pdftoppm_path,
        config.pdf_render_dpi,
        config.jpeg_quality,
    );
    info!(
        "PDF converter: {} at {} dpi, JPEG quality {}",
        config.pdftoppm_path, config.pdf_render_dpi, config.jpeg_quality
    );

    let controller = InteractionController::new(
        Arc::new(converter),
        InferenceDispatcher::new(Arc::new(gemini)),
    );

    // Build app state
    let state = AppState {
        controller: Arc::new(controller),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
