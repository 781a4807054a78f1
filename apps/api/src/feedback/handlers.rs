//! Axum route handlers for the feedback API.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use bytes::Bytes;
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::auth::{StudyToken, TOKEN_HEADER};
use crate::feedback::models::FeedbackResponse;
use crate::feedback::payload::{extract_request, normalize_payload, parse_body};
use crate::feedback::prompts::build_prompt;
use crate::state::AppState;

/// POST /api/ai-feedback
///
/// authenticate → normalize → validate → build prompt → complete → map result.
/// The body is taken as raw bytes: the survey platform does not reliably send
/// `application/json`. `StudyToken` runs before the body is buffered.
pub async fn handle_ai_feedback(
    State(state): State<AppState>,
    StudyToken(token_source): StudyToken,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<FeedbackResponse>, AppError> {
    let request_id = Uuid::new_v4();

    info!(
        %request_id,
        ?token_source,
        content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-"),
        body_bytes = body.len(),
        "Feedback request received"
    );

    let payload = normalize_payload(parse_body(&body));
    debug!(%request_id, payload = %payload, "Normalized payload");

    let request = extract_request(&payload).map_err(|e| {
        warn!(%request_id, "Rejected feedback request: {e}");
        e
    })?;

    let completion = build_prompt(&request).into_completion_request();
    let reply = state.completer.complete(&completion).await?;

    let text = reply
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::EmptyCompletion)?;

    info!(
        %request_id,
        condition = %request.condition,
        reply_chars = text.chars().count(),
        "Feedback generated"
    );

    Ok(Json(FeedbackResponse {
        ai_feedback: text.to_string(),
    }))
}

/// POST /api/debug-echo
///
/// Echoes request headers and the raw body so operators can see exactly what
/// the survey platform sends. Only mounted when `ENABLE_DEBUG_ECHO` is set, and
/// still requires the study token.
pub async fn handle_debug_echo(
    _token: StudyToken,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let mut echoed = Map::new();
    for (name, value) in headers.iter() {
        let value = if name.as_str() == TOKEN_HEADER {
            "[redacted]"
        } else {
            match value.to_str() {
                Ok(v) => v,
                Err(_) => continue,
            }
        };
        echoed.insert(name.as_str().to_string(), json!(value));
    }

    Ok(Json(json!({
        "ok": true,
        "headers": echoed,
        "rawBody": String::from_utf8_lossy(&body),
    })))
}
