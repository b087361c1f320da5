use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Declares the `basic_auth` scheme referenced by the write operations.
struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Basic)
                    .description(Some("Member email and password"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(crate::api::index::api_root),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Events API",
        version = "0.1.0",
        description = "Create, list, fetch and replace events. Responses are HAL documents."
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/events", api = domain_events::handlers::ApiDoc)
    ),
    modifiers(&BasicAuthScheme)
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_event_operations() {
        let doc = ApiDoc::openapi();
        let events = doc.paths.paths.get("/events").unwrap();
        assert!(events.get.is_some());
        assert!(events.post.is_some());

        let event = doc.paths.paths.get("/events/{id}").unwrap();
        assert_eq!(
            event.put.as_ref().unwrap().operation_id.as_deref(),
            Some("update_event")
        );
        assert!(doc.paths.paths.contains_key("/"));
    }

    #[test]
    fn test_basic_auth_scheme_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("basic_auth"));
    }
}
