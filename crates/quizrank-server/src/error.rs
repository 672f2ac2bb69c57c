use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quizrank_core::LeaderboardError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Missing caller identity")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Leaderboard(#[from] LeaderboardError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            ApiError::Leaderboard(err) => match err {
                LeaderboardError::IdentityUnresolved { .. } => StatusCode::NOT_FOUND,
                LeaderboardError::Validation(_) => StatusCode::BAD_REQUEST,
                LeaderboardError::Backend(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("[Api] {}: {}", status, self);
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
