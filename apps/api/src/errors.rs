use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Bodies are flat (`{"error": "...", ...}`) because the survey platform reads
/// `error` directly off the top-level object.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing required fields")]
    MissingFields {
        received: Value,
        received_keys: Vec<String>,
    },

    #[error("Invalid condition: {received}")]
    InvalidCondition { received: Value },

    #[error("Empty AI response")]
    EmptyCompletion,

    #[error("Upstream error: {detail}")]
    Upstream { detail: String },
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream {
            detail: err.detail(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            AppError::MissingFields {
                received,
                received_keys,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing required fields",
                    "received": received,
                    "received_keys": received_keys,
                }),
            ),
            AppError::InvalidCondition { received } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid condition",
                    "received_condition": received,
                }),
            ),
            AppError::EmptyCompletion => {
                tracing::error!("Completion provider returned no usable text");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Empty AI response" }),
                )
            }
            AppError::Upstream { detail } => {
                tracing::error!("Completion provider error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server error", "detail": detail }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unauthorized_leaks_nothing() {
        let response = AppError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await, json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_invalid_condition_echoes_value() {
        let response = AppError::InvalidCondition {
            received: json!("neutral"),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid condition");
        assert_eq!(body["received_condition"], "neutral");
    }

    #[tokio::test]
    async fn test_upstream_error_carries_detail() {
        let response = AppError::from(LlmError::Api {
            status: 429,
            body: r#"{"error":{"message":"quota exceeded"}}"#.to_string(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Server error");
        assert!(body["detail"].as_str().unwrap().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_empty_completion_is_500() {
        let response = AppError::EmptyCompletion.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "Empty AI response");
    }
}
