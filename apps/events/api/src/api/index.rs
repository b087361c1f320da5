//! API root document.

use axum::{Router, extract::State, routing::get};
use axum_helpers::{Hal, RepresentationModel};
use domain_events::EventLinks;

/// API root
///
/// Entry point linking to the event collection.
#[utoipa::path(
    get,
    path = "/",
    tag = "index",
    operation_id = "api_root",
    responses(
        (status = 200, description = "Links to the top-level resources", content_type = "application/hal+json")
    )
)]
pub async fn api_root(State(links): State<EventLinks>) -> Hal<RepresentationModel> {
    Hal(RepresentationModel::new(links.root()))
}

pub fn router(links: EventLinks) -> Router {
    Router::new().route("/", get(api_root)).with_state(links)
}
