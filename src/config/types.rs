// Configuration types
// One struct per frontdoor.toml section.

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listener and runtime configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Worker threads for the runtime; unset means the runtime default
    /// (one per CPU core).
    #[serde(default)]
    pub workers: Option<usize>,
    /// Grace period in seconds applied on SIGTERM/SIGINT.
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: None,
            shutdown_timeout: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format: combined, common or json.
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

fn default_access_log_format() -> String {
    "combined".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            access_log: true,
            access_log_format: default_access_log_format(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Connection behavior configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Allow connection reuse across request/response cycles.
    pub keep_alive: bool,
    /// Seconds a connection may sit without delivering a request head;
    /// 0 disables the idle timeout.
    pub idle_timeout: u64,
    /// Per-request deadline in seconds for the application handler;
    /// unset means the handler may take as long as it wants.
    #[serde(default)]
    pub handler_timeout: Option<u64>,
    /// Hard cap on simultaneously open connections.
    #[serde(default)]
    pub max_connections: Option<u64>,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            keep_alive: true,
            idle_timeout: 75,
            handler_timeout: None,
            max_connections: None,
        }
    }
}

/// HTTP surface configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    /// Value stamped into the `Server` response header.
    pub server_name: String,
    /// Upper bound in bytes on a buffered request body.
    pub max_body_size: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            server_name: "frontdoor/0.2".to_string(),
            max_body_size: 10_485_760, // 10MB
        }
    }
}
