//! Shared application state.

use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Cloned into the readiness handler and the shutdown hook.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// PostgreSQL pool, absent with the in-memory store
    pub db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn in_memory(config: Config) -> Self {
        Self { config, db: None }
    }

    pub fn postgres(config: Config, db: DatabaseConnection) -> Self {
        Self {
            config,
            db: Some(db),
        }
    }
}
