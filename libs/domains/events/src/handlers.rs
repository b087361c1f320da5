use axum::{
    Json, Router,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::{
    AuditEvent, AuditOutcome, EntityModel, Hal, IdPath,
    errors::responses::{InternalServerErrorResponse, UnauthorizedResponse},
    extract_ip_from_headers,
};
use domain_members::Principal;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventError;
use crate::links::{EventLinks, operation};
use crate::models::{Event, EventStatus, PageParams};
use crate::repository::EventRepository;
use crate::service::EventService;
use crate::validation::{EventDto, Rejection, Violation, binding_violations};

pub const TAG: &str = "events";

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(create_event, query_events, get_event, update_event),
    components(
        schemas(Event, EventDto, EventStatus, Violation, Rejection),
        responses(InternalServerErrorResponse, UnauthorizedResponse)
    ),
    tags(
        (name = TAG, description = "Event management with HAL links")
    )
)]
pub struct ApiDoc;

/// Handler state: the service plus the link builder.
pub struct EventsState<R: EventRepository> {
    pub service: EventService<R>,
    pub links: EventLinks,
}

impl<R: EventRepository> EventsState<R> {
    /// 400 with the violations and an `index` link.
    fn rejection(&self, errors: Vec<Violation>) -> Response {
        Rejection::new(errors, self.links.index()).into_response()
    }

    fn reject(&self, err: EventError) -> Response {
        match err.into_violations() {
            Ok(errors) => self.rejection(errors),
            Err(other) => other.into_response(),
        }
    }
}

/// Create the event router. The application mounts it at `/api/events`.
pub fn router<R: EventRepository + 'static>(service: EventService<R>, links: EventLinks) -> Router {
    let state = Arc::new(EventsState { service, links });

    Router::new()
        .route("/", get(query_events).post(create_event))
        .route("/{id}", get(get_event).put(update_event))
        .with_state(state)
}

fn audit(principal: Option<&Principal>, action: &str, event: &Event, headers: &HeaderMap) {
    AuditEvent::new(
        principal.map(|p| p.username().to_string()),
        action,
        Some(format!("event:{}", event.id)),
        AuditOutcome::Success,
    )
    .with_ip(extract_ip_from_headers(headers))
    .with_details(json!({
        "name": event.name,
        "free": event.free,
        "offline": event.offline,
        "event_status": event.event_status.to_string(),
    }))
    .log();
}

/// Create a new event
///
/// The event is stored as a `DRAFT`; `free` and `offline` are derived from
/// the prices and the location.
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    operation_id = "create_event",
    request_body = EventDto,
    responses(
        (status = 201, description = "Event created, `Location` points at it", body = Event, content_type = "application/hal+json"),
        (status = 400, description = "Binding or validation errors", body = Rejection, content_type = "application/hal+json"),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
async fn create_event<R: EventRepository>(
    State(state): State<Arc<EventsState<R>>>,
    principal: Option<Principal>,
    headers: HeaderMap,
    payload: Result<Json<EventDto>, JsonRejection>,
) -> Result<Response, Response> {
    let Json(input) = payload.map_err(|rejection| state.rejection(binding_violations(&rejection)))?;

    let event = state
        .service
        .create_event(input)
        .await
        .map_err(|e| state.reject(e))?;

    audit(principal.as_ref(), "event.create", &event, &headers);

    let location = state.links.event(event.id);
    let links = state.links.created(&event);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Hal(EntityModel::new(event, links)),
    )
        .into_response())
}

/// List events page by page
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    operation_id = "query_events",
    params(PageParams),
    responses(
        (status = 200, description = "HAL page: `_embedded.eventList`, navigation `_links` and `page`"),
        (status = 400, description = "Unknown sort property or malformed paging parameters", body = Rejection, content_type = "application/hal+json"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn query_events<R: EventRepository>(
    State(state): State<Arc<EventsState<R>>>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, Response> {
    let Query(params) = params.map_err(|rejection| {
        state.rejection(vec![Violation::invalid_page_query(rejection.body_text())])
    })?;
    let request = params.into_request().map_err(|e| state.reject(e))?;

    let page = state
        .service
        .list_events(request)
        .await
        .map_err(|e| state.reject(e))?;

    Ok(Hal(state.links.paged(page)).into_response())
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    operation_id = "get_event",
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event, content_type = "application/hal+json"),
        (status = 400, description = "Non-numeric id"),
        (status = 404, description = "Event not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(state): State<Arc<EventsState<R>>>,
    IdPath(id): IdPath,
) -> Result<Response, Response> {
    let event = state
        .service
        .get_event(id)
        .await
        .map_err(|e| state.reject(e))?;

    let links = state.links.single(&event, operation::GET_EVENT);
    Ok(Hal(EntityModel::new(event, links)).into_response())
}

/// Replace an event
///
/// An unknown id answers 404 whatever the payload. `id` and `eventStatus`
/// are preserved; `free` and `offline` are recomputed.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    operation_id = "update_event",
    params(
        ("id" = i32, Path, description = "Event ID")
    ),
    request_body = EventDto,
    responses(
        (status = 200, description = "Event updated", body = Event, content_type = "application/hal+json"),
        (status = 400, description = "Binding or validation errors", body = Rejection, content_type = "application/hal+json"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, description = "Event not found, empty body"),
        (status = 500, response = InternalServerErrorResponse)
    ),
    security((), ("basic_auth" = []))
)]
async fn update_event<R: EventRepository>(
    State(state): State<Arc<EventsState<R>>>,
    IdPath(id): IdPath,
    principal: Option<Principal>,
    headers: HeaderMap,
    payload: Result<Json<EventDto>, JsonRejection>,
) -> Result<Response, Response> {
    let current = state
        .service
        .get_event(id)
        .await
        .map_err(|e| state.reject(e))?;

    let Json(input) = payload.map_err(|rejection| state.rejection(binding_violations(&rejection)))?;

    let event = state
        .service
        .update_event(current, input)
        .await
        .map_err(|e| state.reject(e))?;

    audit(principal.as_ref(), "event.update", &event, &headers);

    let links = state.links.single(&event, operation::UPDATE_EVENT);
    Ok(Hal(EntityModel::new(event, links)).into_response())
}
