// Configuration module entry point
// Layered loading: built-in defaults < config file < environment.

mod types;

pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

use std::net::SocketAddr;

use crate::error::ServerError;

impl Config {
    /// Load configuration from the default `frontdoor.toml` next to the
    /// process, merged with `FRONTDOOR__`-prefixed environment variables.
    pub fn load() -> Result<Self, ServerError> {
        Self::load_from("frontdoor")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; defaults and environment still apply.
    pub fn load_from(config_path: &str) -> Result<Self, ServerError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("FRONTDOOR").separator("__"))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.shutdown_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.idle_timeout", 75)?
            .set_default("http.server_name", "frontdoor/0.2")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .build()?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values that would make the server misbehave rather than
    /// fail. Runs before binding so the process exits with a config
    /// error instead of limping.
    pub fn validate(&self) -> Result<(), ServerError> {
        if self.server.workers == Some(0) {
            return Err(ServerError::InvalidConfig(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.server.shutdown_timeout == 0 {
            return Err(ServerError::InvalidConfig(
                "server.shutdown_timeout must be positive".to_string(),
            ));
        }
        if self.http.max_body_size == 0 {
            return Err(ServerError::InvalidConfig(
                "http.max_body_size must be positive".to_string(),
            ));
        }
        if self.performance.handler_timeout == Some(0) {
            return Err(ServerError::InvalidConfig(
                "performance.handler_timeout must be positive when set".to_string(),
            ));
        }
        if self.performance.max_connections == Some(0) {
            return Err(ServerError::InvalidConfig(
                "performance.max_connections must be positive when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured host/port into the listen address.
    /// Port 0 is accepted and means "pick an ephemeral port".
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }
}
