//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for the domain crates:
//! - `TestDatabase`: PostgreSQL container with the workspace migrations applied (feature: "postgres")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `http`: request builders and body readers for router tests
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let email = builder.email("admin");
//!     let payload = builder.event_payload(1);
//! }
//! ```

use serde_json::{Value, json};

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_event");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique name for testing
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::new(12345);
    /// assert_eq!(builder.name("event", "main"), "test-event-12345-main");
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Unique login email, lowercase.
    pub fn email(&self, prefix: &str) -> String {
        format!("{}-{}@example.com", prefix, self.seed)
    }

    /// A complete, valid event payload named `event <index>`.
    ///
    /// Enrollment runs through 2023-11-16, the event from 2023-11-17 23:59
    /// to 2023-11-18 23:59, prices 10000..100000.
    pub fn event_payload(&self, index: usize) -> Value {
        json!({
            "name": format!("event {}", index),
            "description": "test event",
            "beginEnrollmentDateTime": "2023-11-16T00:00:00",
            "closeEnrollmentDateTime": "2023-11-16T23:59:00",
            "beginEventDateTime": "2023-11-17T23:59:00",
            "endEventDateTime": "2023-11-18T23:59:00",
            "basePrice": 10000,
            "maxPrice": 100000,
            "limitOfEnrollment": 100,
            "location": "Kim's House"
        })
    }
}

/// Request builders and body readers for `tower::ServiceExt::oneshot` tests.
pub mod http {
    use axum::body::Body;
    use axum::http::{HeaderMap, HeaderValue, Method, Request, header};
    use axum::response::Response;
    use axum_extra::headers::{Authorization, HeaderMapExt};
    use http_body_util::BodyExt;
    use serde_json::Value;

    /// `Authorization` value for HTTP Basic credentials.
    pub fn basic_auth(username: &str, password: &str) -> HeaderValue {
        let mut headers = HeaderMap::new();
        headers.typed_insert(Authorization::basic(username, password));
        headers
            .remove(header::AUTHORIZATION)
            .expect("typed_insert sets the header")
    }

    /// Request with a JSON body and `Content-Type: application/json`.
    pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("serializable body")))
            .expect("valid request")
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("valid request")
    }

    pub async fn body_bytes(response: Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("readable body")
            .to_bytes()
            .to_vec()
    }

    /// Parse the response body as JSON.
    pub async fn json_body(response: Response) -> Value {
        let bytes = body_bytes(response).await;
        serde_json::from_slice(&bytes).expect("JSON body")
    }
}

/// Test assertion helpers
pub mod assertions {
    use axum::http::header;
    use axum::response::Response;

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// Assert the response is `application/hal+json`
    pub fn assert_hal_json(response: &Response) {
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(
            content_type.starts_with("application/hal+json"),
            "expected application/hal+json, got '{}'",
            content_type
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_builder_deterministic() {
        let builder1 = TestDataBuilder::new(42);
        let builder2 = TestDataBuilder::new(42);

        assert_eq!(builder1.email("admin"), builder2.email("admin"));
        assert_eq!(
            builder1.name("event", "test"),
            builder2.name("event", "test")
        );
    }

    #[test]
    fn test_data_builder_different_names() {
        let builder1 = TestDataBuilder::from_test_name("test1");
        let builder2 = TestDataBuilder::from_test_name("test2");

        assert_ne!(builder1.email("user"), builder2.email("user"));
    }

    #[test]
    fn test_event_payload_is_complete() {
        let payload = TestDataBuilder::new(1).event_payload(3);
        assert_eq!(payload["name"], "event 3");
        assert_eq!(payload.as_object().unwrap().len(), 10);
    }

    #[test]
    fn test_basic_auth_encoding() {
        let value = http::basic_auth("keesun@email.com", "keesun");
        assert_eq!(value, "Basic a2Vlc3VuQGVtYWlsLmNvbTprZWVzdW4=");
    }
}
