use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::board::BoardError;
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Top-level error for the service shell (startup, serving, CLI).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("board error: {0}")]
    Board(#[from] BoardError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Board errors carry their own status mapping; everything else is an
        // operator-facing fault.
        if let AppError::Board(err) = &self {
            return crate::board::router::error_response(err);
        }

        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
