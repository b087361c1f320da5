use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, Links};
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::{Rejection, Violation};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(i32),

    #[error("Invalid event: {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    #[error("Unsupported sort: {0}")]
    InvalidSort(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl EventError {
    /// Client-facing violations for 400 responses, or the error itself
    /// when it is not a validation failure.
    pub fn into_violations(self) -> Result<Vec<Violation>, EventError> {
        match self {
            EventError::Validation(violations) => Ok(violations),
            EventError::InvalidSort(sort) => Ok(vec![Violation::invalid_sort(&sort)]),
            other => Err(other),
        }
    }
}

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::Validation(_) | EventError::InvalidSort(_) => {
                AppError::BadRequest(err.to_string())
            }
            EventError::Database(e) => AppError::Database(e),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        match self {
            // Bare status, empty body
            EventError::NotFound(id) => {
                tracing::debug!(event_id = id, "Event not found");
                StatusCode::NOT_FOUND.into_response()
            }
            other => match other.into_violations() {
                Ok(errors) => Rejection::new(errors, Links::new()).into_response(),
                Err(other) => AppError::from(other).into_response(),
            },
        }
    }
}
