//! Token refresh worker

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::authn::management_token::ManagementToken;
use crate::authn::session::SessionStore;
use crate::storage::settings::TokenRefreshSettings;

/// Token refresh worker options
#[derive(Debug, Clone)]
pub struct Options {
    /// Check interval
    pub check_interval: Duration,

    /// Refresh when the token expires within this duration
    pub refresh_threshold: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(300),
            refresh_threshold: Duration::from_secs(3600),
        }
    }
}

impl From<&TokenRefreshSettings> for Options {
    fn from(settings: &TokenRefreshSettings) -> Self {
        Self {
            check_interval: Duration::from_secs(settings.check_interval_secs.max(1)),
            refresh_threshold: Duration::from_secs(settings.threshold_secs),
        }
    }
}

/// Outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    SignedOut,
    NotJwt,
    StillValid,
    Refreshed,
    Failed,
}

/// Inspect the session token and refresh it when it is about to expire
pub async fn check_once(options: &Options, session: &SessionStore) -> CheckOutcome {
    let Some(raw) = session.token() else {
        debug!("No operator session, skipping token check");
        return CheckOutcome::SignedOut;
    };

    let token = match ManagementToken::from_raw(raw) {
        Ok(t) => t,
        Err(e) => {
            debug!("Session token is not a JWT, skipping refresh: {}", e);
            return CheckOutcome::NotJwt;
        }
    };

    let threshold_secs = options.refresh_threshold.as_secs() as i64;
    if !token.expires_within(threshold_secs) {
        debug!(
            "Token still valid, expires in {} minutes",
            token.time_until_expiry() / 60
        );
        return CheckOutcome::StillValid;
    }

    info!(
        "Token expires within {} minutes, refreshing...",
        threshold_secs / 60
    );

    match session.refresh().await {
        Ok(true) => {
            info!("Token refreshed successfully");
            CheckOutcome::Refreshed
        }
        Ok(false) => CheckOutcome::SignedOut,
        Err(e) => {
            error!("Failed to refresh token: {}", e);
            CheckOutcome::Failed
        }
    }
}

/// Run the token refresh worker
pub async fn run<S, F>(
    options: &Options,
    session: &SessionStore,
    sleep_fn: S,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) where
    S: Fn(Duration) -> F,
    F: Future<Output = ()>,
{
    info!("Token refresh worker starting...");

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Token refresh worker shutting down...");
                return;
            }
            _ = sleep_fn(options.check_interval) => {}
        }

        check_once(options, session).await;
    }
}
