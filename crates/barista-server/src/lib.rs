//! Barista server library logic.

pub mod api;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use barista_agent::BaristaAgent;
use barista_voice::VoiceService;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Active ordering sessions keyed by session ID.
pub type SessionMap = HashMap<String, Arc<Mutex<BaristaAgent>>>;

/// Application state shared across all request handlers.
pub struct AppState {
    /// LiveKit token issuing and data publishing.
    pub voice_service: Arc<VoiceService>,
    /// One agent per session.
    ///
    /// Uses `std::sync::RwLock` intentionally: the map lock is only held for
    /// brief get/insert/remove calls and never across an `.await`. Tool calls
    /// within a session are serialized by the per-agent `tokio::sync::Mutex`.
    pub sessions: Arc<RwLock<SessionMap>>,
    /// Directory finalized orders are written to.
    pub orders_dir: PathBuf,
    /// Delay between saving an order and publishing its receipt.
    pub publish_delay: Duration,
}

impl AppState {
    pub fn new(
        voice_service: VoiceService,
        orders_dir: impl Into<PathBuf>,
        publish_delay: Duration,
    ) -> Self {
        Self {
            voice_service: Arc::new(voice_service),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            orders_dir: orders_dir.into(),
            publish_delay,
        }
    }
}

/// Maximum request body size (64 KiB). Tool arguments are short strings.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions", post(api::create_session_handler))
        .route(
            "/api/sessions/{sessionId}",
            delete(api::delete_session_handler),
        )
        .route(
            "/api/sessions/{sessionId}/tools",
            get(api::get_tools_handler),
        )
        .route(
            "/api/sessions/{sessionId}/tools/{toolName}",
            post(api::invoke_tool_handler),
        )
        .route(
            "/api/sessions/{sessionId}/order",
            get(api::get_order_handler),
        )
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
