//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::window::OccupancyInterval;
use crate::services::EngineError;

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    /// Present on conflict responses: the occupancy intervals the request
    /// collided with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflicts: Option<Vec<OccupancyInterval>>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            conflicts: None,
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Conflict(Vec<OccupancyInterval>),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", msg)),
            AppError::Conflict(conflicts) => {
                let mut error = ApiError::new(
                    "CONFLICT",
                    format!(
                        "request overlaps {} existing occupancy interval(s)",
                        conflicts.len()
                    ),
                );
                error.conflicts = Some(conflicts);
                (StatusCode::CONFLICT, error)
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("INTERNAL_ERROR", msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(msg) => AppError::BadRequest(msg),
            EngineError::Conflict(conflicts) => AppError::Conflict(conflicts),
            EngineError::NotFound(msg) => AppError::NotFound(msg),
            EngineError::Transaction(msg) => AppError::Internal(msg),
        }
    }
}

impl From<crate::models::time::TimeError> for AppError {
    fn from(err: crate::models::time::TimeError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}
