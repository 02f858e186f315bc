//! Webhook receiver handler.
//!
//! Formaloo posts deliveries to `/webhook/{instance_id}`. The body is
//! normalised by the core receiver and emitted as one JSON line on stdout,
//! the event stream downstream consumers read.

use std::io::Write;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use serde_json::Value;
use uuid::Uuid;

use formaloo_types::error::FormalooError;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /webhook/{instance_id} - Receive a Formaloo delivery.
pub async fn receive_webhook(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let instance_id = Uuid::parse_str(&instance_id).map_err(|_| {
        FormalooError::Validation(format!("invalid trigger instance id '{instance_id}'"))
    })?;

    let content_type = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    tracing::debug!(%instance_id, content_type, bytes = body.len(), "webhook delivery received");

    let event = state
        .receiver
        .receive(&instance_id, decode_body(&body))
        .await;
    emit_event(&event)?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(Json(ApiResponse::success(
        serde_json::json!({
            "received": true,
            "instance_id": instance_id,
        }),
        request_id,
        elapsed,
    )))
}

/// JSON when the body parses, otherwise the body as a (lossy) string.
fn decode_body(body: &[u8]) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

fn emit_event(event: &Value) -> Result<(), AppError> {
    let line = serde_json::to_string(event)
        .map_err(|e| AppError::Internal(format!("failed to encode event: {e}")))?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{line}")
        .and_then(|_| stdout.flush())
        .map_err(|e| AppError::Internal(format!("failed to emit event: {e}")))
}
