//! API handlers for the cheervox server.

use crate::bridge::{BridgeError, BridgeStatus};
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Extension, Json},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cheervox_types::TriggerConfig;
use cheervox_voice::decode_server_message;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<BridgeError> for ApiError {
    fn from(e: BridgeError) -> Self {
        match e {
            BridgeError::InvalidConfig(_) => ApiError::BadRequest(e.to_string()),
            BridgeError::Assistant(_) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

/// Trigger configuration as returned by the API. The credential itself is
/// never serialized; only whether one is set.
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    #[serde(flatten)]
    pub triggers: TriggerConfig,
    pub assistant_credential_set: bool,
}

impl From<TriggerConfig> for ConfigResponse {
    fn from(triggers: TriggerConfig) -> Self {
        let assistant_credential_set = !triggers.assistant_credential.is_empty();
        Self {
            triggers,
            assistant_credential_set,
        }
    }
}

/// Handler for `GET /health`.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Handler for `GET /api/config`.
pub async fn get_config_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<ConfigResponse> {
    Json(state.bridge.config().await.into())
}

/// Handler for `PUT /api/config`.
///
/// Replaces the trigger configuration and performs a full reset. A request
/// without a credential keeps the one already configured.
pub async fn update_config_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(mut config): Json<TriggerConfig>,
) -> Result<Json<ConfigResponse>, ApiError> {
    if config.assistant_credential.is_empty() {
        config.assistant_credential = state.bridge.config().await.assistant_credential;
    }

    state.bridge.apply_config(config.clone()).await?;
    tracing::info!(
        channel = %config.channel_name,
        min_bits = config.min_bits,
        "trigger configuration updated"
    );
    Ok(Json(config.into()))
}

/// Handler for `GET /api/status`.
pub async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> Json<BridgeStatus> {
    Json(state.bridge.status().await)
}

/// Handler for `POST /api/assistant/events`.
///
/// Accepts assistant server messages. Messages that carry no lifecycle
/// signal are acknowledged and ignored.
pub async fn assistant_events_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let event = decode_server_message(&body)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    if let Some(event) = event {
        tracing::debug!(?event, "assistant event received");
        state.bridge.forward_assistant_event(event).await;
    }
    Ok(StatusCode::OK)
}
