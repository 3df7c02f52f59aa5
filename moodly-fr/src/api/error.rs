//! Error responses for the board endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use moodly_common::Error;
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    BoardNotFound(String),
    SectionNotFound { board_id: String, section_id: String },
    NotFound(String),
    InvalidInput(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::InvalidInput(msg),
            not_found @ Error::NotFound(_) => ApiError::NotFound(not_found.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BoardNotFound(board_id) => {
                (StatusCode::NOT_FOUND, format!("Board not found: {}", board_id))
            }
            ApiError::SectionNotFound { board_id, section_id } => (
                StatusCode::NOT_FOUND,
                format!("Section {} not found on board {}", section_id, board_id),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => {
                error!("Request failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
