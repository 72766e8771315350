//! Application state management

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::options::ViewOptions;
use crate::authn::session::{SessionState, SessionStore, TokenStorage};
use crate::errors::ConsoleError;
use crate::http::api::ManagementApi;
use crate::pages::dashboard::DashboardSnapshot;
use crate::pages::deployment_details::DeploymentDetail;
use crate::pages::flash::FlashBoard;
use crate::pages::views::ViewRegistry;

/// The open dashboard or deployment detail view
pub type ConsoleViews = ViewRegistry<DashboardSnapshot, DeploymentDetail>;

/// Main application state
pub struct AppState {
    /// Management API client
    pub api: Arc<dyn ManagementApi>,

    /// Operator session
    pub session: Arc<SessionStore>,

    /// Live views
    pub views: Arc<ConsoleViews>,

    /// Pending action feedback
    pub flashes: Arc<FlashBoard>,

    /// Page defaults
    pub view_options: ViewOptions,
}

impl AppState {
    pub fn new(api: Arc<dyn ManagementApi>, session: Arc<SessionStore>, view_options: ViewOptions) -> Self {
        Self {
            api,
            session,
            views: Arc::new(ConsoleViews::new()),
            flashes: Arc::new(FlashBoard::new()),
            view_options,
        }
    }

    /// Initialize application state.
    ///
    /// The returned task tears the views down whenever the session ends.
    pub async fn init(
        api: Arc<dyn ManagementApi>,
        storage: Arc<dyn TokenStorage>,
        view_options: ViewOptions,
        shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
    ) -> Result<(Self, JoinHandle<()>), ConsoleError> {
        info!("Initializing application state...");

        let session = Arc::new(SessionStore::load(api.clone(), storage).await);
        let state = Self::new(api, session, view_options);

        let handle = tokio::spawn(watch_session(
            state.session.subscribe(),
            state.views.clone(),
            state.flashes.clone(),
            shutdown_signal,
        ));

        Ok((state, handle))
    }

    /// Shutdown application state
    pub async fn shutdown(&self) -> Result<(), ConsoleError> {
        info!("Shutting down application state...");
        self.views.close();
        self.flashes.clear();
        Ok(())
    }
}

async fn watch_session(
    mut changes: watch::Receiver<SessionState>,
    views: Arc<ConsoleViews>,
    flashes: Arc<FlashBoard>,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) {
    let mut was_authenticated = changes.borrow().is_authenticated();

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => return,
            changed = changes.changed() => {
                if changed.is_err() {
                    return;
                }
            }
        }

        let authenticated = changes.borrow_and_update().is_authenticated();
        if was_authenticated && !authenticated {
            debug!("Session ended, closing views");
            views.close();
            flashes.clear();
        }
        was_authenticated = authenticated;
    }
}
