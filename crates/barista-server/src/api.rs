//! Session and tool API handlers.
//!
//! A session pairs one LiveKit room with one [`BaristaAgent`]. The browser
//! creates a session to obtain its join token; the voice worker then relays
//! every function call the language model makes to the session's tool
//! endpoint and speaks the returned `output`.

use crate::AppState;
use barista_agent::{tool_definitions, BaristaAgent, OrderStore, ToolDefinition, BARISTA_INSTRUCTIONS};
use barista_types::OrderRecord;
use axum::{
    body::Bytes,
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Request body for session creation.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Display name for the browser participant.
    #[serde(rename = "participantName", default)]
    pub participant_name: Option<String>,
}

/// Connection details returned to the frontend.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    #[serde(rename = "roomName")]
    pub room_name: String,
    /// LiveKit server URL; empty when LiveKit is not configured.
    #[serde(rename = "serverUrl")]
    pub server_url: String,
    #[serde(rename = "participantName")]
    pub participant_name: String,
    /// Join token; absent when LiveKit is not configured.
    #[serde(rename = "participantToken")]
    pub participant_token: Option<String>,
}

/// Instructions and tool schema for the language model.
#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub instructions: &'static str,
    pub tools: Vec<ToolDefinition>,
}

/// Result of a tool invocation, to be relayed to the customer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ToolOutputResponse {
    pub output: String,
}

/// Snapshot of a session's order.
#[derive(Debug, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: OrderRecord,
    pub complete: bool,
    pub finalized: bool,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

fn find_session(state: &AppState, session_id: &str) -> Result<Arc<Mutex<BaristaAgent>>, ApiError> {
    let sessions = state
        .sessions
        .read()
        .map_err(|_| ApiError::InternalServerError("session lock poisoned".to_string()))?;
    sessions
        .get(session_id)
        .cloned()
        .ok_or_else(|| ApiError::NotFound(format!("session not found: {}", session_id)))
}

/// Handler for `POST /api/sessions`.
///
/// The body is optional; an empty body is treated as `{}`.
pub async fn create_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let payload: CreateSessionRequest = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid session request: {}", e)))?
    };

    let session_id = Uuid::new_v4().to_string();
    let room_name = format!("barista-{}", session_id);
    let participant_name = payload
        .participant_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "Customer".to_string());

    let participant_token = if state.voice_service.is_enabled() {
        let identity = format!("customer-{}", session_id);
        let token = state
            .voice_service
            .generate_join_token(&room_name, &identity, &participant_name)
            .map_err(|e| ApiError::InternalServerError(format!("token generation failed: {}", e)))?;
        Some(token)
    } else {
        None
    };

    let mut agent = BaristaAgent::new(OrderStore::new(&state.orders_dir))
        .with_publish_delay(state.publish_delay);
    if let Some(publisher) = state.voice_service.publisher(&room_name) {
        agent = agent.with_publisher(Arc::new(publisher));
    }

    state
        .sessions
        .write()
        .map_err(|_| ApiError::InternalServerError("session lock poisoned".to_string()))?
        .insert(session_id.clone(), Arc::new(Mutex::new(agent)));

    tracing::info!(session_id = %session_id, room = %room_name, "created ordering session");

    Ok(Json(CreateSessionResponse {
        session_id,
        room_name,
        server_url: state.voice_service.get_url().to_string(),
        participant_name,
        participant_token,
    }))
}

/// Handler for `GET /api/sessions/{sessionId}/tools`.
pub async fn get_tools_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<ToolsResponse>, ApiError> {
    find_session(&state, &session_id)?;
    Ok(Json(ToolsResponse {
        instructions: BARISTA_INSTRUCTIONS,
        tools: tool_definitions(),
    }))
}

/// Handler for `POST /api/sessions/{sessionId}/tools/{toolName}`.
///
/// The body is the raw JSON arguments object produced by the model; an
/// empty body is treated as `{}`.
pub async fn invoke_tool_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((session_id, tool_name)): Path<(String, String)>,
    arguments: String,
) -> Result<Json<ToolOutputResponse>, ApiError> {
    let agent = find_session(&state, &session_id)?;
    let mut agent = agent.lock().await;

    let output = agent.dispatch(&tool_name, &arguments).await.map_err(|e| {
        tracing::error!(session_id = %session_id, tool = %tool_name, "tool call failed: {}", e);
        ApiError::InternalServerError(e.to_string())
    })?;

    Ok(Json(ToolOutputResponse { output }))
}

/// Handler for `GET /api/sessions/{sessionId}/order`.
pub async fn get_order_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let agent = find_session(&state, &session_id)?;
    let agent = agent.lock().await;

    Ok(Json(OrderResponse {
        order: agent.order().to_record(),
        complete: agent.order().is_complete(),
        finalized: agent.is_finalized(),
    }))
}

/// Handler for `DELETE /api/sessions/{sessionId}`.
///
/// Drops the session's agent. A receipt publication that is already
/// scheduled still goes out.
pub async fn delete_session_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .sessions
        .write()
        .map_err(|_| ApiError::InternalServerError("session lock poisoned".to_string()))?
        .remove(&session_id);

    match removed {
        Some(_) => {
            tracing::info!(session_id = %session_id, "ended ordering session");
            Ok(StatusCode::NO_CONTENT)
        }
        None => Err(ApiError::NotFound(format!(
            "session not found: {}",
            session_id
        ))),
    }
}
