use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MemberError {
    #[error("No member registered as '{0}'")]
    UsernameNotFound(String),

    #[error("Bad credentials")]
    InvalidCredentials,

    #[error("Member '{0}' already exists")]
    DuplicateEmail(String),

    #[error("A member needs at least one role")]
    NoRoles,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type MemberResult<T> = Result<T, MemberError>;

impl From<MemberError> for AppError {
    fn from(err: MemberError) -> Self {
        match err {
            // Unknown login and wrong password must look the same to clients
            MemberError::UsernameNotFound(_) | MemberError::InvalidCredentials => {
                AppError::Unauthorized("Bad credentials".to_string())
            }
            MemberError::DuplicateEmail(email) => {
                AppError::Conflict(format!("Member '{}' already exists", email))
            }
            MemberError::NoRoles => AppError::BadRequest(err.to_string()),
            MemberError::PasswordHash(msg) | MemberError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
            MemberError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for MemberError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_lookup_failures_are_unauthorized() {
        let unknown: AppError = MemberError::UsernameNotFound("x@example.com".into()).into();
        let wrong: AppError = MemberError::InvalidCredentials.into();

        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[test]
    fn test_duplicate_is_conflict() {
        let err: AppError = MemberError::DuplicateEmail("a@b.c".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
