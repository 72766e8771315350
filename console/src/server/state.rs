//! Server state

use std::sync::Arc;

use crate::app::options::ViewOptions;
use crate::app::state::{AppState, ConsoleViews};
use crate::authn::session::SessionStore;
use crate::http::api::ManagementApi;
use crate::pages::flash::FlashBoard;
use crate::pages::PageContext;

/// Server state shared across handlers
pub struct ServerState {
    pub api: Arc<dyn ManagementApi>,
    pub session: Arc<SessionStore>,
    pub views: Arc<ConsoleViews>,
    pub flashes: Arc<FlashBoard>,
    pub view_options: ViewOptions,
}

impl ServerState {
    pub fn new(app_state: &AppState) -> Self {
        Self {
            api: app_state.api.clone(),
            session: app_state.session.clone(),
            views: app_state.views.clone(),
            flashes: app_state.flashes.clone(),
            view_options: app_state.view_options,
        }
    }

    /// Page collaborators, with the feedback pending for `path`
    pub fn page_context(&self, path: &str) -> PageContext<'_> {
        PageContext {
            api: self.api.as_ref(),
            session: self.session.as_ref(),
            page_size: self.view_options.page_size,
            flashes: self.flashes.take(path),
        }
    }
}
