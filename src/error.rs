use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::slack::{verify::VerifyError, SlackError};

/// Per-request failure. Every variant ends the request; none ends the process.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] VerifyError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Slack(#[from] SlackError),
    #[error("invalid modal template: {0}")]
    Template(#[from] serde_json::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Unauthorized(err) => tracing::warn!(error = %err, "rejected unsigned request"),
            Self::BadRequest(_) => tracing::warn!(error = %self, "malformed payload"),
            Self::Slack(_) | Self::Template(_) => tracing::error!(error = %self, "request failed"),
        }

        match self {
            Self::Unauthorized(_) => {
                (StatusCode::UNAUTHORIZED, Json(json!({"status": false}))).into_response()
            }
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"status": false, "message": message})),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"status": false, "message": other.to_string()})),
            )
                .into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
