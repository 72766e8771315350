//! Server-held views that keep refreshing while they are open
//!
//! The dashboard and the deployment detail page load on open, reload on
//! demand and on their auto-refresh timer. Only one of them is open at a
//! time; opening another page closes it, which supersedes its outstanding
//! loads and stops its timer.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::authn::session::SessionStore;
use crate::components::html::disabled;
use crate::http::client::ApiError;
use crate::pages::handle_load_error;
use crate::pages::select_options;
use crate::sync::auto_refresh::{AutoRefresh, RefreshCallback, REFRESH_CHOICES};
use crate::sync::loader::{Loader, ViewState};

/// Fetches the data of a view with the given token
pub type Fetch<T> = Arc<dyn Fn(String) -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// A view whose data lives on the server between requests
pub struct LiveView<T> {
    session: Arc<SessionStore>,
    loader: Arc<Loader<T>>,
    fetch: Fetch<T>,
    fallback: &'static str,
    refresh: Mutex<AutoRefresh>,
}

async fn run_load<T: Clone>(
    session: &SessionStore,
    loader: &Loader<T>,
    fetch: &Fetch<T>,
    fallback: &str,
    silent: bool,
) {
    let Some(token) = session.token() else {
        return;
    };

    let ticket = loader.begin(silent);
    let result = fetch(token.clone()).await;

    // A superseded load only settles its loading flag, even on a 401
    if !loader.is_current(&ticket) {
        loader.finish(ticket, Err(String::new()));
        debug!("Discarded result of a superseded load");
        return;
    }

    let result = match result {
        Ok(data) => Ok(data),
        Err(e) => Err(handle_load_error(session, &token, &e, fallback).await),
    };
    if !loader.finish(ticket, result) {
        debug!("Discarded result of a superseded load");
    }
}

impl<T: Clone + Send + Sync + 'static> LiveView<T> {
    pub fn open(
        session: Arc<SessionStore>,
        fetch: Fetch<T>,
        fallback: &'static str,
        refresh_ms: u64,
    ) -> Self {
        let view = Self {
            session,
            loader: Arc::new(Loader::new()),
            fetch,
            fallback,
            refresh: Mutex::new(AutoRefresh::new()),
        };

        let callback = view.refresh_callback();
        {
            let mut refresh = view.lock_refresh();
            refresh.set_callback(callback);
            refresh.configure(Duration::from_millis(refresh_ms), refresh_ms > 0);
        }
        view
    }

    fn lock_refresh(&self) -> MutexGuard<'_, AutoRefresh> {
        self.refresh.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Timer work; holds the collaborators, not the view
    fn refresh_callback(&self) -> RefreshCallback {
        let session = self.session.clone();
        let loader = self.loader.clone();
        let fetch = self.fetch.clone();
        let fallback = self.fallback;

        Arc::new(move || {
            let session = session.clone();
            let loader = loader.clone();
            let fetch = fetch.clone();
            Box::pin(async move {
                run_load(&session, &loader, &fetch, fallback, true).await;
            })
        })
    }

    /// Load now; a silent load leaves the loading indicator alone
    pub async fn load(&self, silent: bool) {
        run_load(&self.session, &self.loader, &self.fetch, self.fallback, silent).await;
    }

    pub fn state(&self) -> ViewState<T> {
        self.loader.snapshot()
    }

    /// Current auto-refresh interval in milliseconds, 0 when off
    pub fn refresh_ms(&self) -> u64 {
        self.lock_refresh()
            .interval()
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// Select one of the offered intervals; returns whether the timer changed
    pub fn set_refresh_ms(&self, refresh_ms: u64) -> bool {
        if !REFRESH_CHOICES.iter().any(|(ms, _)| *ms == refresh_ms) {
            return false;
        }
        self.lock_refresh()
            .configure(Duration::from_millis(refresh_ms), refresh_ms > 0)
    }

    pub fn close(&self) {
        self.loader.cancel();
        self.lock_refresh().stop();
    }

    /// Seconds between browser reloads matching the timer
    pub fn reload_secs(&self) -> Option<u64> {
        Some(self.refresh_ms() / 1000).filter(|s| *s > 0)
    }
}

enum OpenView<D, P> {
    Dashboard(Arc<LiveView<D>>),
    Deployment { id: String, view: Arc<LiveView<P>> },
}

impl<D: Clone + Send + Sync + 'static, P: Clone + Send + Sync + 'static> OpenView<D, P> {
    fn close(&self) {
        match self {
            OpenView::Dashboard(view) => view.close(),
            OpenView::Deployment { view, .. } => view.close(),
        }
    }
}

/// The single open live view
pub struct ViewRegistry<D, P> {
    open: Mutex<Option<OpenView<D, P>>>,
}

impl<D, P> Default for ViewRegistry<D, P> {
    fn default() -> Self {
        Self {
            open: Mutex::new(None),
        }
    }
}

impl<D: Clone + Send + Sync + 'static, P: Clone + Send + Sync + 'static> ViewRegistry<D, P> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<OpenView<D, P>>> {
        self.open.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The dashboard view, opening it when needed; the flag tells whether it
    /// was just opened
    pub fn dashboard(&self, open: impl FnOnce() -> LiveView<D>) -> (Arc<LiveView<D>>, bool) {
        let mut current = self.lock();
        if let Some(OpenView::Dashboard(view)) = current.as_ref() {
            return (view.clone(), false);
        }

        if let Some(previous) = current.take() {
            previous.close();
        }
        info!("Opening dashboard view");
        let view = Arc::new(open());
        *current = Some(OpenView::Dashboard(view.clone()));
        (view, true)
    }

    /// The detail view of deployment `id`, opening it when needed
    pub fn deployment(
        &self,
        id: &str,
        open: impl FnOnce() -> LiveView<P>,
    ) -> (Arc<LiveView<P>>, bool) {
        let mut current = self.lock();
        if let Some(OpenView::Deployment { id: open_id, view }) = current.as_ref() {
            if open_id == id {
                return (view.clone(), false);
            }
        }

        if let Some(previous) = current.take() {
            previous.close();
        }
        info!("Opening deployment view {}", id);
        let view = Arc::new(open());
        *current = Some(OpenView::Deployment {
            id: id.to_string(),
            view: view.clone(),
        });
        (view, true)
    }

    /// The deployment view if `id` is the one open
    pub fn open_deployment(&self, id: &str) -> Option<Arc<LiveView<P>>> {
        match self.lock().as_ref() {
            Some(OpenView::Deployment { id: open_id, view }) if open_id == id => Some(view.clone()),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_some()
    }

    /// Close whatever is open
    pub fn close(&self) {
        if let Some(previous) = self.lock().take() {
            previous.close();
        }
    }
}

/// Auto-refresh picker and `Atualizar` button of a live view
pub(crate) fn refresh_controls(base_path: &str, refresh_ms: u64, loading: bool) -> String {
    let current = refresh_ms.to_string();
    let values: Vec<(String, &str)> = REFRESH_CHOICES
        .iter()
        .map(|(ms, label)| (ms.to_string(), *label))
        .collect();
    let choices: Vec<(&str, &str)> = values.iter().map(|(v, l)| (v.as_str(), *l)).collect();
    let button = if loading { "Atualizando..." } else { "Atualizar" };

    format!(
        r#"<form method="post" action="{base_path}/refresh" class="control-inline"><label>Auto-refresh<select name="interval_ms">{}</select></label><button type="submit" class="ghost">Aplicar</button></form><form method="post" action="{base_path}/reload"><button type="submit"{}>{}</button></form>"#,
        select_options(&current, &choices),
        disabled(loading),
        button,
    )
}
