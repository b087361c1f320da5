//! Integer identifier path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};

/// Extracts a single `i32` path segment such as `/events/{id}`.
///
/// Non-numeric or out-of-range values are rejected with a 400
/// [`ErrorResponse`](crate::ErrorResponse) instead of axum's plain-text rejection.
///
/// ```ignore
/// async fn get_event(IdPath(id): IdPath) -> String {
///     format!("event {}", id)
/// }
///
/// let app = Router::new().route("/events/{id}", get(get_event));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i32);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        raw.parse::<i32>().map(IdPath).map_err(|_| {
            AppError::BadRequest(format!("Invalid identifier: {}", raw)).into_response()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new().route(
            "/items/{id}",
            get(|IdPath(id): IdPath| async move { id.to_string() }),
        )
    }

    #[tokio::test]
    async fn test_numeric_id_extracted() {
        let response = app()
            .oneshot(Request::get("/items/42").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_non_numeric_id_rejected() {
        for path in ["/items/abc", "/items/99999999999"] {
            let response = app()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", path);
        }
    }
}
