//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::ConsoleError;
use crate::server::handlers::{
    audit_apply_handler, audit_handler, audit_reload_handler, dashboard_handler,
    dashboard_refresh_handler, dashboard_reload_handler, deployment_cancel_confirm_handler,
    deployment_cancel_handler, deployment_handler, deployment_refresh_handler,
    deployment_reload_handler, deployments_apply_handler, deployments_handler,
    deployments_reload_handler, device_handler, device_status_confirm_handler,
    device_status_handler, devices_apply_handler, devices_handler, devices_reload_handler,
    fallback_handler, health_handler, login_handler, login_page_handler, logout_handler,
    require_session, stylesheet_handler, version_handler,
};
use crate::server::state::ServerState;

/// Build the console router
pub fn router(state: Arc<ServerState>) -> Router {
    let protected = Router::new()
        // Dashboard
        .route("/", get(dashboard_handler))
        .route("/dashboard/reload", post(dashboard_reload_handler))
        .route("/dashboard/refresh", post(dashboard_refresh_handler))
        // Devices
        .route("/devices", get(devices_handler))
        .route("/devices/apply", get(devices_apply_handler))
        .route("/devices/reload", post(devices_reload_handler))
        .route("/devices/{id}", get(device_handler))
        .route("/devices/{id}/status", post(device_status_handler))
        .route("/devices/{id}/status/{status}", get(device_status_confirm_handler))
        // Deployments
        .route("/deployments", get(deployments_handler))
        .route("/deployments/apply", get(deployments_apply_handler))
        .route("/deployments/reload", post(deployments_reload_handler))
        .route("/deployments/{id}", get(deployment_handler))
        .route("/deployments/{id}/reload", post(deployment_reload_handler))
        .route("/deployments/{id}/refresh", post(deployment_refresh_handler))
        .route(
            "/deployments/{id}/cancel",
            get(deployment_cancel_confirm_handler).post(deployment_cancel_handler),
        )
        // Audit
        .route("/audit", get(audit_handler))
        .route("/audit/apply", get(audit_apply_handler))
        .route("/audit/reload", post(audit_reload_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/static/console.css", get(stylesheet_handler))
        // Session
        .route("/login", get(login_page_handler).post(login_handler))
        .route("/logout", post(logout_handler))
        .merge(protected)
        .fallback(fallback_handler)
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), ConsoleError>>, ConsoleError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting console on http://{}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ConsoleError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ConsoleError::ServerError(e.to_string()))
    });

    Ok(handle)
}
