use core_config::{ConfigError, FromEnv, env_flag, env_optional};
use std::fmt;

use crate::models::{MemberRole, NewMember};

/// A member to create at start-up if missing.
#[derive(Clone)]
pub struct SeedMember {
    pub email: String,
    pub password: String,
    pub roles: Vec<MemberRole>,
}

impl fmt::Debug for SeedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedMember")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("roles", &self.roles)
            .finish()
    }
}

impl From<SeedMember> for NewMember {
    fn from(seed: SeedMember) -> Self {
        NewMember::new(seed.email, seed.password, seed.roles)
    }
}

/// Authentication settings.
///
/// | Variable | Default |
/// |---|---|
/// | `AUTH_PROTECT_WRITES` | `false` |
/// | `ADMIN_EMAIL` / `ADMIN_PASSWORD` | unset, seeds an ADMIN + USER member |
/// | `USER_EMAIL` / `USER_PASSWORD` | unset, seeds a USER member |
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Reject POST/PUT requests that carry no credentials
    pub protect_writes: bool,
    pub seeds: Vec<SeedMember>,
}

impl FromEnv for AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let protect_writes = env_flag("AUTH_PROTECT_WRITES", false)?;

        let seeds = [
            seed_from_env(
                "ADMIN_EMAIL",
                "ADMIN_PASSWORD",
                vec![MemberRole::Admin, MemberRole::User],
            )?,
            seed_from_env("USER_EMAIL", "USER_PASSWORD", vec![MemberRole::User])?,
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(Self {
            protect_writes,
            seeds,
        })
    }
}

/// Both variables or neither.
fn seed_from_env(
    email_key: &str,
    password_key: &str,
    roles: Vec<MemberRole>,
) -> Result<Option<SeedMember>, ConfigError> {
    match (env_optional(email_key), env_optional(password_key)) {
        (Some(email), Some(password)) => Ok(Some(SeedMember {
            email,
            password,
            roles,
        })),
        (None, None) => Ok(None),
        (Some(_), None) => Err(ConfigError::MissingEnvVar(password_key.to_string())),
        (None, Some(_)) => Err(ConfigError::MissingEnvVar(email_key.to_string())),
    }
}
