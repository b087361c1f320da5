use axum::{Router, middleware, routing::get};
use axum_helpers::server::{create_router, health_router};
use domain_events::{EventLinks, EventRepository, EventService, handlers};
use domain_members::{BasicAuth, MemberRepository, MemberService, basic_auth};
use std::io;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod health;
pub mod index;

/// Creates the API routes without the `/api` prefix, which `create_router`
/// adds. Every route runs behind the Basic authentication middleware.
pub fn routes<E, M>(state: &AppState, events: EventService<E>, members: MemberService<M>) -> Router
where
    E: EventRepository + 'static,
    M: MemberRepository + 'static,
{
    let links = EventLinks::new(state.config.server.public_base_url.clone());
    let auth = BasicAuth::new(members, state.config.auth.protect_writes);

    Router::new()
        .merge(index::router(links.clone()))
        .nest("/events", handlers::router(events, links))
        .layer(middleware::from_fn_with_state(auth, basic_auth::<M>))
}

/// Router with the `/ready` endpoint that checks the store.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}

/// The complete application: API, documentation, `/health` and `/ready`.
pub async fn app<E, M>(
    state: &AppState,
    events: EventService<E>,
    members: MemberService<M>,
) -> io::Result<Router>
where
    E: EventRepository + 'static,
    M: MemberRepository + 'static,
{
    let cors = axum_helpers::cors_layer_from_env(&state.config.environment)?;
    let router = create_router::<ApiDoc>(routes(state, events, members), cors).await?;

    Ok(router
        .merge(health_router(state.config.app))
        .merge(ready_router(state.clone())))
}
