use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};
use database::postgres::PostgresConfig;
use domain_members::AuthConfig;

pub use core_config::Environment;

/// Application configuration, composed from the shared config components.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    /// `None` when `DATABASE_URL` is unset: events and members live in memory
    pub database: Option<PostgresConfig>,
    pub auth: AuthConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?;
        let database = match env_optional("DATABASE_URL") {
            Some(_) => Some(PostgresConfig::from_env()?),
            None => None,
        };
        let auth = AuthConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            database,
            auth,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_without_database_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None::<&str>),
                ("ADMIN_EMAIL", None),
                ("ADMIN_PASSWORD", None),
                ("USER_EMAIL", None),
                ("USER_PASSWORD", None),
                ("PORT", Some("9090")),
                ("PUBLIC_BASE_URL", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.database.is_none());
                assert!(config.auth.seeds.is_empty());
                assert_eq!(config.server.public_base_url, "http://localhost:9090");
                assert_eq!(config.app.name, "events_api");
            },
        );
    }

    #[test]
    fn test_postgres_with_database_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/events")),
                ("DB_MAX_CONNECTIONS", Some("10")),
            ],
            || {
                let config = Config::from_env().unwrap();
                let database = config.database.unwrap();
                assert_eq!(database.url(), "postgresql://localhost/events");
                assert_eq!(database.max_connections, 10);
            },
        );
    }

    #[test]
    fn test_half_configured_seed_fails() {
        temp_env::with_vars(
            [
                ("ADMIN_EMAIL", Some("admin@email.com")),
                ("ADMIN_PASSWORD", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("ADMIN_PASSWORD"));
            },
        );
    }
}
