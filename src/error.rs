//! Shared error envelope for all Chimera HTTP handlers.
//!
//! Every endpoint in `spec.md` §6 replies with the same JSON shape on
//! failure: `{"message", "details": {"errorCode", "errorMessage"}}`,
//! status 500 regardless of error kind. `AppError` centralizes that so
//! handlers just return `Result<T, AppError>` and use `?`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Io(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Worker(String),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    fn error_kind(&self) -> &'static str {
        match self {
            AppError::Io(_) => "IOError",
            AppError::Validation(_) => "ValidationError",
            AppError::Worker(_) => "WorkerError",
            AppError::Other(_) => "Error",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Worker(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Validation(e.to_string())
    }
}

#[derive(Debug, Serialize)]
struct ErrorDetails {
    #[serde(rename = "errorCode")]
    error_code: u16,
    #[serde(rename = "errorMessage")]
    error_message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    message: String,
    details: ErrorDetails,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "handler failed");
        let body = ErrorEnvelope {
            message: self.to_string(),
            details: ErrorDetails {
                error_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                error_message: self.error_kind(),
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_shape() {
        let resp = AppError::Validation("X_train_rows and y_train_rows length mismatch".into())
            .into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["details"]["errorCode"], 500);
        assert_eq!(v["details"]["errorMessage"], "ValidationError");
        assert!(v["message"].as_str().unwrap().contains("length mismatch"));
    }
}
