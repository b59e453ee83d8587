//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::Role;

/// Root configuration for giglink
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Marketplace API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Push/notification channel configuration
    #[serde(default)]
    pub push: PushConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Marketplace API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the marketplace REST API
    #[serde(default = "default_api_base")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.giglink.io/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Push channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// WebSocket URL of the notification channel
    #[serde(default = "default_push_url")]
    pub url: String,
    /// Delay between reconnection attempts in seconds
    #[serde(default = "default_reconnect_secs")]
    pub reconnect_secs: u64,
}

fn default_push_url() -> String {
    "wss://push.giglink.io/ws".to_string()
}

fn default_reconnect_secs() -> u64 {
    5
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            url: default_push_url(),
            reconnect_secs: default_reconnect_secs(),
        }
    }
}

/// Authentication configuration
///
/// The token is issued by the marketplace at login; this layer only
/// carries it. See [`crate::session::AuthSession`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Bearer token for API and push-channel access
    #[serde(default)]
    pub token: String,
    /// Identifier of the logged-in user
    #[serde(default)]
    pub user_id: String,
    /// Marketplace role of the logged-in user
    #[serde(default)]
    pub role: Role,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (text, json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Directory for log files
    #[serde(default = "default_log_dir")]
    pub dir: String,
    /// Module-specific overrides
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            dir: default_log_dir(),
            overrides: HashMap::new(),
        }
    }
}
