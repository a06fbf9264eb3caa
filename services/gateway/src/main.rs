mod config;
mod elevenlabs;
mod error;
mod gemini;
mod replicate;
mod routes_script;
mod routes_video;
mod routes_voice;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::state::{AppState, SharedState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;
    let state = Arc::new(AppState::new(cfg));

    // --- Startup health checks (fail fast) ---
    startup_checks(&state).await?;

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/api/generate-script", post(routes_script::generate_script))
        .route("/api/generate-voice", post(routes_voice::generate_voice))
        .route("/api/generate-video", post(routes_video::generate_video))
        .route("/api/video-status", post(routes_video::video_status))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    let addr = &state.config.bind_addr;
    println!("gateway listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn startup_checks(state: &SharedState) -> Result<()> {
    replicate::check_account(&state.http, &state.config.replicate_api_token)
        .await
        .context("Replicate credential check failed")?;
    info!("replicate: ok");

    Ok(())
}

async fn healthz() -> &'static str {
    "ok"
}
