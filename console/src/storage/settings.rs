//! Settings file management

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ConsoleError;
use crate::filesys::file::File;
use crate::logs::LogLevel;

/// Environment variable overriding the management API base URL
pub const API_BASE_URL_ENV: &str = "HARBOR_API_BASE_URL";

/// Console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Also write logs to the storage `logs/` directory
    #[serde(default)]
    pub log_to_file: bool,

    /// Management API configuration
    #[serde(default)]
    pub api: ApiSettings,

    /// Local HTTP server configuration
    #[serde(default)]
    pub server: ServerSettings,

    /// Dashboard auto-refresh interval in milliseconds, 0 disables it
    #[serde(default = "default_dashboard_refresh_ms")]
    pub dashboard_refresh_ms: u64,

    /// Deployment detail auto-refresh interval in milliseconds, 0 disables it
    #[serde(default = "default_deployment_refresh_ms")]
    pub deployment_refresh_ms: u64,

    /// Rows requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Session token refresh worker
    #[serde(default)]
    pub token_refresh: TokenRefreshSettings,
}

fn default_true() -> bool {
    true
}

fn default_dashboard_refresh_ms() -> u64 {
    15_000
}

fn default_deployment_refresh_ms() -> u64 {
    30_000
}

fn default_page_size() -> u32 {
    20
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_to_file: false,
            api: ApiSettings::default(),
            server: ServerSettings::default(),
            dashboard_refresh_ms: default_dashboard_refresh_ms(),
            deployment_refresh_ms: default_deployment_refresh_ms(),
            page_size: default_page_size(),
            token_refresh: TokenRefreshSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from file, falling back to defaults when it is missing,
    /// then apply environment overrides.
    pub async fn load(file: &File) -> Result<Self, ConsoleError> {
        let mut settings = match file.read_json_opt::<Settings>().await? {
            Some(settings) => settings,
            None => {
                info!(
                    "No settings file at {}, using defaults",
                    file.path().display()
                );
                Settings::default()
            }
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Apply overrides from a key lookup (the process environment in production)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(API_BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = base_url;
        }
    }
}

/// Management API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL for the management API, including the version prefix
    #[serde(default = "default_api_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Local HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token refresh worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRefreshSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How often the token expiry is checked
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Refresh when the token expires within this many seconds
    #[serde(default = "default_threshold_secs")]
    pub threshold_secs: u64,
}

fn default_check_interval_secs() -> u64 {
    300
}

fn default_threshold_secs() -> u64 {
    3600
}

impl Default for TokenRefreshSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            check_interval_secs: default_check_interval_secs(),
            threshold_secs: default_threshold_secs(),
        }
    }
}
