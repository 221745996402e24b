use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::AppState;

/// Header the assistant service uses to carry the shared webhook secret.
pub const WEBHOOK_SECRET_HEADER: &str = "x-vapi-secret";

/// Rejects webhook calls whose `x-vapi-secret` does not match the configured
/// secret. Passes everything through when no secret is configured.
pub async fn webhook_secret_middleware(
    req: Request<Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?
        .clone();

    if let Some(expected) = state.webhook_secret.as_deref() {
        let provided = req
            .headers()
            .get(WEBHOOK_SECRET_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!("rejected assistant webhook with missing or wrong secret");
            return Err(StatusCode::UNAUTHORIZED);
        }
    }

    Ok(next.run(req).await)
}
