use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use lexmate_core::{assistant::Assistant, error::AssistantError, types::ResponseType};
use lexmate_llm::GeminiBackend;
use lexmate_research::{ChromaRetriever, TavilySearcher};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::AppState;

// ── Request body ──────────────────────────────────────────────────────────

/// One conversational turn, with the caller's provider credentials.
#[derive(Deserialize)]
pub(crate) struct AskBody {
    pub query: String,
    pub session_id: Option<String>,
    /// Mandatory: the language model cannot run without it.
    pub google_api_key: String,
    /// Mandatory for the legal pipeline; retrieval cannot run without it.
    #[serde(default)]
    pub retrieval_api_key: String,
    /// Optional: web search degrades to a skip sentinel when absent.
    #[serde(default)]
    pub search_api_key: String,
}

// ── Error helpers ─────────────────────────────────────────────────────────

fn bad_request(detail: String) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "detail": detail })))
}

fn not_found(detail: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": detail })))
}

// ── Per-request assistant construction ────────────────────────────────────

/// Build a fully-wired pipeline from the caller's keys. Credential checks
/// happen here, before any model call runs.
fn build_assistant(state: &AppState, body: &AskBody) -> Result<Assistant, AssistantError> {
    if body.google_api_key.trim().is_empty() {
        return Err(AssistantError::Configuration(
            "a Google API key must be provided to initialize the model".into(),
        ));
    }
    if body.retrieval_api_key.trim().is_empty() {
        return Err(AssistantError::Configuration(
            "a retrieval (Cohere) API key is mandatory for RAG functionality".into(),
        ));
    }

    let cfg = &state.config;
    let llm = Arc::new(
        GeminiBackend::new(body.google_api_key.trim(), &cfg.gemini_model)
            .with_base_url(&cfg.gemini_base_url)
            .with_timeout(cfg.request_timeout_s),
    );
    let retriever = Arc::new(ChromaRetriever::new(
        &cfg.chroma_url,
        &cfg.chroma_collection,
        &cfg.cohere_embed_model,
        body.retrieval_api_key.trim(),
        cfg.retrieval_top_k,
        cfg.request_timeout_s,
    ));
    let searcher = if body.search_api_key.trim().is_empty() {
        None
    } else {
        Some(Arc::new(TavilySearcher::new(
            body.search_api_key.trim(),
            cfg.web_max_results,
            cfg.request_timeout_s,
        )) as Arc<dyn lexmate_core::research::WebSearcher>)
    };

    Ok(Assistant::new(
        llm,
        Some(retriever),
        searcher,
        Arc::clone(&state.sessions),
    ))
}

fn session_id_or_new(requested: &Option<String>) -> String {
    requested
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

// ── Chat endpoints ────────────────────────────────────────────────────────

/// Modern endpoint: adaptive envelope with derived metadata.
pub(crate) async fn ask_adaptive(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let session_id = session_id_or_new(&body.session_id);
    // Credential failures use the shared detail body, like the other chat
    // endpoints; only pipeline failures get the adaptive error envelope.
    let assistant = build_assistant(&state, &body).map_err(|e| bad_request(e.apology()))?;

    let response = assistant.ask_adaptive(&body.query, &session_id).await;
    let status_is_error = response.response_type == ResponseType::Error;
    let value = serde_json::to_value(response).unwrap_or_default();
    if status_is_error {
        Err((StatusCode::BAD_REQUEST, Json(value)))
    } else {
        Ok(Json(value))
    }
}

/// Simplified endpoint: just the answer text and session id.
pub(crate) async fn ask_simple(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let session_id = session_id_or_new(&body.session_id);
    let assistant = build_assistant(&state, &body).map_err(|e| bad_request(e.apology()))?;

    match assistant.ask(&body.query, &session_id).await {
        Ok(response) => Ok(Json(json!({
            "response": response,
            "session_id": session_id,
        }))),
        Err(e) => {
            tracing::error!(session_id, "simple request failed: {e:#}");
            Err(bad_request(e.apology()))
        }
    }
}

/// Legacy endpoint: structured explanation/sections/summary shape.
pub(crate) async fn ask_legacy(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AskBody>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let session_id = session_id_or_new(&body.session_id);
    let assistant = build_assistant(&state, &body).map_err(|e| bad_request(e.apology()))?;

    match assistant.ask_legacy(&body.query, &session_id).await {
        Ok(response) => Ok(Json(serde_json::to_value(response).unwrap_or_default())),
        Err(e) => {
            tracing::error!(session_id, "legacy request failed: {e:#}");
            Err(bad_request(e.apology()))
        }
    }
}

// ── Session management ────────────────────────────────────────────────────

pub(crate) async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Value> {
    let sessions = state.sessions.sessions_with_titles().await;
    Json(json!({ "count": sessions.len(), "sessions": sessions }))
}

pub(crate) async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.sessions.messages(&session_id).await {
        Some(messages) => Ok(Json(json!({
            "session_id": session_id,
            "count": messages.len(),
            "messages": messages,
        }))),
        None => Err(not_found("Session not found")),
    }
}

pub(crate) async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if state.sessions.delete(&session_id).await {
        Ok(Json(json!({
            "message": format!("Session {session_id} completely deleted"),
            "success": true,
            "session_id": session_id,
        })))
    } else {
        Err(not_found("Session not found"))
    }
}

pub(crate) async fn clear_history(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if state.sessions.clear(&session_id).await {
        Ok(Json(json!({
            "message": format!("Chat history cleared for session {session_id}"),
            "success": true,
            "session_id": session_id,
        })))
    } else {
        Err(not_found("Session not found"))
    }
}

pub(crate) async fn clear_all_histories(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.sessions.clear_all().await;
    Json(json!({
        "message": "All session histories cleared.",
        "success": true,
    }))
}

// ── Health / status ───────────────────────────────────────────────────────

pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "active_sessions": state.sessions.len().await,
        "uptime_s": state.start_time.elapsed().as_secs(),
    }))
}

pub(crate) async fn root() -> Json<Value> {
    Json(json!({
        "message": "LexMate legal-assistant service is running.",
        "note": "This service requires API keys to be provided in the request body.",
    }))
}
