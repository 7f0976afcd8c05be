//! Server configuration loading from file and environment variables.

use barista_voice::LiveKitConfig;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Order persistence and receipt publication settings.
    #[serde(default)]
    pub orders: OrdersConfig,

    /// LiveKit connection settings. An empty URL disables LiveKit.
    #[serde(default)]
    pub livekit: LiveKitConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "barista_agent=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrdersConfig {
    /// Directory finalized orders are written to.
    #[serde(default = "default_orders_dir")]
    pub dir: String,

    /// Seconds between saving an order and publishing its receipt.
    #[serde(default = "default_publish_delay_secs")]
    pub publish_delay_secs: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_orders_dir() -> String {
    barista_agent::DEFAULT_ORDERS_DIR.to_string()
}

fn default_publish_delay_secs() -> u64 {
    barista_agent::DEFAULT_PUBLISH_DELAY.as_secs()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            dir: default_orders_dir(),
            publish_delay_secs: default_publish_delay_secs(),
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `BARISTA_HOST` overrides `server.host`
/// - `BARISTA_PORT` overrides `server.port`
/// - `BARISTA_LOG_LEVEL` overrides `logging.level`
/// - `BARISTA_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `BARISTA_ORDERS_DIR` overrides `orders.dir`
/// - `BARISTA_PUBLISH_DELAY_SECS` overrides `orders.publish_delay_secs`
/// - `LIVEKIT_URL`, `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET` override `livekit.*`
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("BARISTA_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("BARISTA_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(level) = std::env::var("BARISTA_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("BARISTA_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Ok(dir) = std::env::var("BARISTA_ORDERS_DIR") {
        config.orders.dir = dir;
    }
    if let Ok(delay) = std::env::var("BARISTA_PUBLISH_DELAY_SECS") {
        if let Ok(parsed) = delay.parse() {
            config.orders.publish_delay_secs = parsed;
        }
    }
    if let Ok(url) = std::env::var("LIVEKIT_URL") {
        config.livekit.url = url;
    }
    if let Ok(key) = std::env::var("LIVEKIT_API_KEY") {
        config.livekit.api_key = key;
    }
    if let Ok(secret) = std::env::var("LIVEKIT_API_SECRET") {
        config.livekit.api_secret = secret;
    }

    Ok(config)
}
