use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use domain_events::{
    EventRepository, EventService, InMemoryEventRepository, PgEventRepository,
};
use domain_members::{
    InMemoryMemberRepository, MemberRepository, MemberService, NewMember, PgMemberRepository,
};
use migration::Migrator;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    match config.database.clone() {
        Some(database) => {
            let db = connect_from_config_with_retry(database, None)
                .await
                .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
            run_migrations::<Migrator>(&db, config.app.name).await?;

            let events = EventService::new(PgEventRepository::new(db.clone()));
            let members = MemberService::new(PgMemberRepository::new(db.clone()));
            serve(AppState::postgres(config, db), events, members).await
        }
        None => {
            warn!("DATABASE_URL not set, events and members are kept in memory");
            let events = EventService::new(InMemoryEventRepository::new());
            let members = MemberService::new(InMemoryMemberRepository::new());
            serve(AppState::in_memory(config), events, members).await
        }
    }
}

async fn serve<E, M>(
    state: AppState,
    events: EventService<E>,
    members: MemberService<M>,
) -> eyre::Result<()>
where
    E: EventRepository + 'static,
    M: MemberRepository + 'static,
{
    let seeds = state.config.auth.seeds.iter().cloned().map(NewMember::from);
    let created = members.seed(seeds).await?;
    info!(
        created,
        configured = state.config.auth.seeds.len(),
        "Member seeding finished"
    );

    let app = api::app(&state, events, members).await?;

    info!("Starting events API with graceful shutdown (30s timeout)");

    let db = state.db.clone();

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(db) = db {
                info!("Shutting down: closing database connections");
                match db.close().await {
                    Ok(_) => info!("PostgreSQL connection closed successfully"),
                    Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
                }
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Events API shutdown complete");
    Ok(())
}
