use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{delete, get, post},
    Router,
};
use lexmate_core::{config::Config, session::SessionStore};
use tower_http::cors::CorsLayer;
use tracing::info;

mod routes;

// ── AppState ──────────────────────────────────────────────────────────────

pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub start_time: Instant,
}

// ── main ──────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lexmate_server=info,lexmate_core=info".into()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    info!(
        model = %config.gemini_model,
        chroma = %config.chroma_url,
        "configuration loaded"
    );

    let state = Arc::new(AppState {
        config: Arc::clone(&config),
        sessions: SessionStore::new(),
        start_time: Instant::now(),
    });

    let app = Router::new()
        .route("/", get(routes::root))
        .route("/chat/health", get(routes::health))
        .route("/chat/legal_assistant", post(routes::ask_adaptive))
        .route("/chat/legal_assistant/simple", post(routes::ask_simple))
        .route("/chat/legal_assistant/legacy", post(routes::ask_legacy))
        .route("/chat/sessions", get(routes::list_sessions))
        .route("/chat/sessions/:session_id", delete(routes::delete_session))
        .route("/chat/history/all", delete(routes::clear_all_histories))
        .route(
            "/chat/history/:session_id",
            get(routes::get_history).delete(routes::clear_history),
        )
        // The original service allowed all origins; keep permissive CORS.
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("{}:{}", config.bind, config.port);
    info!("server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
