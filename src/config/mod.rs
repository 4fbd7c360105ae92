use std::env;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_request_size_bytes: usize,
}

impl AppConfig {
    /// Load configuration from the process environment.
    /// `DATABASE_URL` and `PORT` are required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        if url::Url::parse(&url).is_err() {
            return Err(ConfigError::Invalid { name: "DATABASE_URL", value: redact(&url) });
        }

        let port_raw = lookup("PORT")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("PORT"))?;
        let port = parse_port(&port_raw)
            .ok_or(ConfigError::Invalid { name: "PORT", value: port_raw.clone() })?;

        Ok(Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port,
                shutdown_grace_secs: 10,
            },
            database: DatabaseConfig {
                url,
                max_connections: 10,
                connection_timeout: 30,
            },
            api: ApiConfig {
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
        }
        .with_overrides(&lookup))
    }

    fn with_overrides<F>(mut self, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server overrides
        if let Some(v) = lookup("HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = v.trim().to_string();
        }
        if let Some(v) = lookup("SHUTDOWN_GRACE_SECS") {
            self.server.shutdown_grace_secs = v.trim().parse().unwrap_or(self.server.shutdown_grace_secs);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.trim().parse().unwrap_or(self.database.connection_timeout);
        }

        // API overrides
        if let Some(v) = lookup("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.trim().parse().unwrap_or(self.api.max_request_size_bytes);
        }

        self
    }

    /// Address the listener binds to, e.g. `0.0.0.0:2565`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_grace_secs)
    }
}

impl DatabaseConfig {
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    /// Connection string with the password masked, safe for logs
    pub fn redacted_url(&self) -> String {
        redact(&self.url)
    }
}

/// Accepts both `2565` and the listen-address form `:2565`
fn parse_port(raw: &str) -> Option<u16> {
    let trimmed = raw.trim();
    trimmed.strip_prefix(':').unwrap_or(trimmed).parse().ok()
}

fn redact(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("****"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable>".to_string(),
    }
}
