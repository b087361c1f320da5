use crate::{env_optional, env_or_default, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible origin used when building absolute hrefs.
    /// Never ends with a slash.
    pub public_base_url: String,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            public_base_url: default_public_base_url(port),
        }
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = normalize_base_url(url.into());
        self
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_public_base_url(port: u16) -> String {
    format!("http://localhost:{}", port)
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

impl FromEnv for ServerConfig {
    /// Reads from environment variables with sensible defaults:
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    /// - PUBLIC_BASE_URL: defaults to `http://localhost:{PORT}`
    fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default("HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = env_or_default("PORT", "8080").parse().map_err(|e| {
            ConfigError::ParseError {
                key: "PORT".to_string(),
                details: format!("{}", e),
            }
        })?;

        let public_base_url = match env_optional("PUBLIC_BASE_URL") {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                normalize_base_url(url)
            }
            Some(url) => {
                return Err(ConfigError::ParseError {
                    key: "PUBLIC_BASE_URL".to_string(),
                    details: format!("'{}' must start with http:// or https://", url),
                })
            }
            None => default_public_base_url(port),
        };

        Ok(Self {
            host,
            port,
            public_base_url,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(Ipv4Addr::UNSPECIFIED.to_string(), 8080)
    }
}
