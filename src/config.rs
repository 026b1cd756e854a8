use std::time::Duration;

use thiserror::Error;

/// Server configuration loaded from environment variables.
///
/// | Env Var                | Default                      |
/// |------------------------|------------------------------|
/// | `API_BASE_URL`         | `http://localhost:5000/api`  |
/// | `HOST`                 | `0.0.0.0`                    |
/// | `PORT`                 | `8083`                       |
/// | `PUBLIC_URL`           | `http://localhost:8083`      |
/// | `FRONTEND_URL`         | `http://localhost:3000`      |
/// | `REQUEST_TIMEOUT_SECS` | `15`                         |
/// | `CORS_ORIGINS`         | unset (permissive)           |
#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the remote commerce API.
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    /// Where payment gateways can reach this service.
    pub public_url: String,
    /// Browser app that shoppers are redirected back to after paying.
    pub frontend_url: String,
    /// Upper bound for a single upstream call.
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be a valid {expected}, got {value:?}")]
    Invalid { key: &'static str, expected: &'static str, value: String },
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".into(),
            host: "0.0.0.0".into(),
            port: 8083,
            public_url: "http://localhost:8083".into(),
            frontend_url: "http://localhost:3000".into(),
            request_timeout: Duration::from_secs(15),
            cors_origins: vec![],
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()).unwrap_or(default);
        let url = |key: &str, default: String| text(key, default).trim_end_matches('/').to_string();

        let port = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid { key: "PORT", expected: "u16", value: v })?,
            None => defaults.port,
        };
        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().map_err(|_| ConfigError::Invalid { key: "REQUEST_TIMEOUT_SECS", expected: "u64", value: v })?),
            None => defaults.request_timeout,
        };
        let cors_origins = lookup("CORS_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        Ok(Self {
            api_base_url: url("API_BASE_URL", defaults.api_base_url),
            host: text("HOST", defaults.host),
            port,
            public_url: url("PUBLIC_URL", defaults.public_url),
            frontend_url: url("FRONTEND_URL", defaults.frontend_url),
            request_timeout,
            cors_origins,
        })
    }

    pub fn bind_addr(&self) -> String { format!("{}:{}", self.host, self.port) }
}
