//! Application configuration options

use std::time::Duration;

use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;
use crate::workers::token_refresh;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Lifecycle configuration
    pub lifecycle: LifecycleOptions,

    /// Management API configuration
    pub api: ApiOptions,

    /// Storage configuration
    pub storage: StorageOptions,

    /// Console HTTP server configuration
    pub server: ServerOptions,

    /// Page behavior
    pub views: ViewOptions,

    /// Enable the token refresh worker
    pub enable_token_refresh_worker: bool,

    /// Token refresh worker options
    pub token_refresh_worker: token_refresh::Options,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            lifecycle: LifecycleOptions::default(),
            api: ApiOptions::default(),
            storage: StorageOptions::default(),
            server: ServerOptions::default(),
            views: ViewOptions::default(),
            enable_token_refresh_worker: true,
            token_refresh_worker: token_refresh::Options::default(),
        }
    }
}

impl AppOptions {
    /// Options from the settings file stored under `layout`
    pub fn from_settings(settings: &Settings, layout: StorageLayout) -> Self {
        Self {
            api: ApiOptions {
                base_url: settings.api.base_url.clone(),
                request_timeout: Duration::from_secs(settings.api.request_timeout_secs.max(1)),
            },
            storage: StorageOptions { layout },
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            views: ViewOptions {
                dashboard_refresh_ms: settings.dashboard_refresh_ms,
                deployment_refresh_ms: settings.deployment_refresh_ms,
                page_size: settings.page_size.max(1),
            },
            enable_token_refresh_worker: settings.token_refresh.enabled,
            token_refresh_worker: token_refresh::Options::from(&settings.token_refresh),
            ..Default::default()
        }
    }
}

/// Lifecycle options for the console
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

/// Management API options
#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub base_url: String,
    pub request_timeout: Duration,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Storage configuration options
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Storage layout paths
    pub layout: StorageLayout,
}

/// Console HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Defaults of the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    /// Initial dashboard auto-refresh interval, 0 is off
    pub dashboard_refresh_ms: u64,

    /// Initial deployment detail auto-refresh interval, 0 is off
    pub deployment_refresh_ms: u64,

    /// Rows per list page
    pub page_size: u32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            dashboard_refresh_ms: 15_000,
            deployment_refresh_ms: 30_000,
            page_size: 20,
        }
    }
}
