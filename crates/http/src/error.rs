//! Error handling for the Unfail HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

/// Message returned for internal failures in release builds.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Message returned when a request runs past `server.request_timeout_ms`.
pub const REQUEST_TIMEOUT_MESSAGE: &str = "The request took too long. Please try again.";

/// Body of every error response: `{ "error": "<message>" }`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {message}")]
    BadRequest { message: String, code: String },

    /// An upstream collaborator answered but its answer was unusable.
    /// The message is safe to show to callers.
    #[error("upstream failure: {message}")]
    Upstream { message: String, code: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            code: "bad_request".to_string(),
        }
    }

    /// Create an upstream error with a caller-visible message
    pub fn upstream(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
            code: code.into(),
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Upstream { .. } | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let timestamp = OffsetDateTime::now_utc().to_string();
        let status = self.status();

        let (error_code, message) = match self {
            AppError::BadRequest { message, code } => (code, message),
            AppError::Upstream { message, code } => (code, message),
            AppError::Internal(e) => {
                tracing::error!(error_id = %error_id, error = ?e, "internal error");

                // Hide internal details outside debug builds
                let message = if cfg!(debug_assertions) {
                    e.to_string()
                } else {
                    UNKNOWN_ERROR_MESSAGE.to_string()
                };
                ("internal_error".to_string(), message)
            }
        };

        tracing::error!(
            error_id = %error_id,
            error_code = %error_code,
            status_code = %status.as_u16(),
            timestamp = %timestamp,
            "Request error"
        );

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn bad_request_body_is_flat() {
        let response = AppError::bad_request("User input is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "User input is required"})
        );
    }

    #[tokio::test]
    async fn upstream_message_is_shown() {
        let response = AppError::upstream("structured_response", "model said nonsense").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["error"], "model said nonsense");
    }

    #[tokio::test]
    async fn internal_error_mapping() {
        let error = AppError::Internal(anyhow::anyhow!("connection reset"));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        if cfg!(debug_assertions) {
            assert_eq!(message, "connection reset");
        } else {
            assert_eq!(message, UNKNOWN_ERROR_MESSAGE);
        }
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}
