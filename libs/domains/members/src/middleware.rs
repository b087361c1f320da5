//! HTTP Basic authentication.
//!
//! [`basic_auth`] resolves `Authorization: Basic` credentials through the
//! [`MemberService`] and stores the resulting [`Principal`] in the request
//! extensions, where handlers pick it up with `Principal` or
//! `Option<Principal>` extractors.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{HeaderValue, Method, header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Basic};
use axum_helpers::{AppError, AuditEvent, AuditOutcome, extract_ip_from_headers};
use std::convert::Infallible;
use std::sync::Arc;

use crate::error::MemberError;
use crate::models::Principal;
use crate::repository::MemberRepository;
use crate::service::MemberService;

const CHALLENGE: &str = "Basic realm=\"events\"";

/// Middleware state for [`basic_auth`].
pub struct BasicAuth<R: MemberRepository> {
    service: Arc<MemberService<R>>,
    protect_writes: bool,
}

impl<R: MemberRepository> Clone for BasicAuth<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            protect_writes: self.protect_writes,
        }
    }
}

impl<R: MemberRepository> BasicAuth<R> {
    pub fn new(service: MemberService<R>, protect_writes: bool) -> Self {
        Self {
            service: Arc::new(service),
            protect_writes,
        }
    }
}

/// 401 with a `WWW-Authenticate` challenge.
fn challenge(message: &str) -> Response {
    let mut response = AppError::Unauthorized(message.to_string()).into_response();
    response
        .headers_mut()
        .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(CHALLENGE));
    response
}

fn is_write(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT)
}

enum Credentials {
    Absent,
    Unsupported,
    Basic { username: String, password: String },
}

fn credentials(request: &Request) -> Credentials {
    let headers = request.headers();
    if !headers.contains_key(header::AUTHORIZATION) {
        return Credentials::Absent;
    }

    match headers.typed_get::<Authorization<Basic>>() {
        Some(Authorization(basic)) => Credentials::Basic {
            username: basic.username().to_string(),
            password: basic.password().to_string(),
        },
        None => Credentials::Unsupported,
    }
}

/// Authenticates Basic credentials when present.
///
/// - no `Authorization` header: anonymous, unless writes are protected and
///   the request is a POST or PUT
/// - valid credentials: the [`Principal`] is inserted into the extensions
/// - anything else: 401 with `WWW-Authenticate: Basic realm="events"`
pub async fn basic_auth<R: MemberRepository + 'static>(
    State(auth): State<BasicAuth<R>>,
    mut request: Request,
    next: Next,
) -> Response {
    match credentials(&request) {
        Credentials::Absent => {
            if auth.protect_writes && is_write(request.method()) {
                return challenge("Authentication required");
            }
        }
        Credentials::Unsupported => return challenge("Unsupported authorization scheme"),
        Credentials::Basic { username, password } => {
            match auth.service.authenticate(&username, &password).await {
                Ok(principal) => {
                    tracing::debug!(username = principal.username(), "Authenticated request");
                    request.extensions_mut().insert(principal);
                }
                Err(MemberError::InvalidCredentials) => {
                    AuditEvent::new(Some(username), "auth.basic", None, AuditOutcome::Denied)
                        .with_ip(extract_ip_from_headers(request.headers()))
                        .log();
                    return challenge("Bad credentials");
                }
                Err(e) => return AppError::from(e).into_response(),
            }
        }
    }

    next.run(request).await
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| challenge("Authentication required"))
    }
}

impl<S> OptionalFromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Principal>().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberRole, NewMember};
    use crate::repository::InMemoryMemberRepository;
    use axum::{
        Router,
        body::Body,
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;

    // base64("keesun@email.com:keesun")
    const GOOD: &str = "Basic a2Vlc3VuQGVtYWlsLmNvbTprZWVzdW4=";
    // base64("keesun@email.com:wrong")
    const BAD: &str = "Basic a2Vlc3VuQGVtYWlsLmNvbTp3cm9uZw==";

    async fn app(protect_writes: bool) -> Router {
        let service = MemberService::new(InMemoryMemberRepository::new());
        service
            .register(NewMember::new(
                "keesun@email.com",
                "keesun",
                [MemberRole::Admin, MemberRole::User],
            ))
            .await
            .unwrap();

        Router::new()
            .route(
                "/whoami",
                get(|principal: Option<Principal>| async move {
                    principal.map_or_else(|| "anonymous".to_string(), |p| p.username().to_string())
                })
                .post(|principal: Principal| async move { principal.username().to_string() }),
            )
            .layer(from_fn_with_state(
                BasicAuth::new(service, protect_writes),
                basic_auth::<InMemoryMemberRepository>,
            ))
    }

    fn request(method: Method, auth: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().method(method).uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn text(response: Response) -> String {
        use http_body_util::BodyExt;
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_anonymous_read_allowed() {
        let response = app(true)
            .await
            .oneshot(request(Method::GET, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "anonymous");
    }

    #[tokio::test]
    async fn test_valid_credentials_attach_principal() {
        let response = app(false)
            .await
            .oneshot(request(Method::GET, Some(GOOD)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(text(response).await, "keesun@email.com");
    }

    #[tokio::test]
    async fn test_bad_credentials_challenge() {
        let response = app(false)
            .await
            .oneshot(request(Method::GET, Some(BAD)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "Basic realm=\"events\""
        );
    }

    #[tokio::test]
    async fn test_bearer_scheme_rejected() {
        let response = app(false)
            .await
            .oneshot(request(Method::GET, Some("Bearer abc")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_protected_write_requires_credentials() {
        let response = app(true)
            .await
            .oneshot(request(Method::POST, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app(true)
            .await
            .oneshot(request(Method::POST, Some(GOOD)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
