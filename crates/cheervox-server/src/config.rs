//! Server configuration loading from file and environment variables.

use cheervox_chat::DEFAULT_IRC_ADDR;
use cheervox_types::TriggerConfig;
use cheervox_voice::VapiConfig;
use serde::Deserialize;
use std::fmt;
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

    /// Voice assistant API and webhook settings.
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Chat connection settings.
    #[serde(default)]
    pub chat: ChatConfig,

    /// Initial trigger configuration. Replaceable at runtime.
    #[serde(default)]
    pub triggers: TriggerConfig,
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
    /// Log level filter (e.g., "info", "debug", "cheervox_session=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

#[derive(Clone, Default, Deserialize)]
pub struct AssistantConfig {
    #[serde(flatten)]
    pub vapi: VapiConfig,

    /// Shared secret the assistant service sends in `x-vapi-secret`. When
    /// unset, webhook requests are not authenticated.
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("vapi", &self.vapi)
            .field(
                "webhook_secret",
                &self.webhook_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// IRC endpoint, `host:port`.
    #[serde(default = "default_irc_addr")]
    pub irc_addr: String,
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

fn default_irc_addr() -> String {
    DEFAULT_IRC_ADDR.to_string()
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

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            irc_addr: default_irc_addr(),
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

/// Loads configuration from a TOML file, falling back to defaults, then
/// applies environment overrides.
///
/// Environment variable overrides:
/// - `CHEERVOX_HOST` overrides `server.host`
/// - `CHEERVOX_PORT` overrides `server.port`
/// - `CHEERVOX_LOG_LEVEL` overrides `logging.level`
/// - `CHEERVOX_LOG_JSON` overrides `logging.json` (set to "true" to enable)
/// - `CHEERVOX_WEBHOOK_SECRET` overrides `assistant.webhook_secret`
/// - `CHEERVOX_CHANNEL` overrides `triggers.channel_name`
/// - `CHEERVOX_ASSISTANT_ID` overrides `triggers.assistant_id`
/// - `CHEERVOX_ASSISTANT_KEY` overrides `triggers.assistant_credential`
/// - `CHEERVOX_MIN_BITS` overrides `triggers.min_bits`
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

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

/// Applies `CHEERVOX_*` overrides read through `var`. Unparseable numeric or
/// address values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(parsed) = var("CHEERVOX_HOST").and_then(|v| v.parse().ok()) {
        config.server.host = parsed;
    }
    if let Some(parsed) = var("CHEERVOX_PORT").and_then(|v| v.parse().ok()) {
        config.server.port = parsed;
    }
    if let Some(level) = var("CHEERVOX_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = var("CHEERVOX_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }
    if let Some(secret) = var("CHEERVOX_WEBHOOK_SECRET") {
        config.assistant.webhook_secret = Some(secret).filter(|s| !s.is_empty());
    }
    if let Some(channel) = var("CHEERVOX_CHANNEL") {
        config.triggers.channel_name = channel;
    }
    if let Some(assistant_id) = var("CHEERVOX_ASSISTANT_ID") {
        config.triggers.assistant_id = assistant_id;
    }
    if let Some(key) = var("CHEERVOX_ASSISTANT_KEY") {
        config.triggers.assistant_credential = key;
    }
    if let Some(parsed) = var("CHEERVOX_MIN_BITS").and_then(|v| v.parse().ok()) {
        config.triggers.min_bits = parsed;
    }
}
