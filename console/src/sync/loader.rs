//! Generation-guarded view state

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

/// What a view renders
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

/// Handed out when a load starts and returned with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    silent: bool,
}

impl LoadTicket {
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

struct Inner<T> {
    state: ViewState<T>,
    /// Generation of the latest load that shows the loading indicator
    visible_generation: u64,
}

/// Holds the state of a view and discards results of superseded loads.
///
/// The most recently started load wins regardless of completion order.
pub struct Loader<T> {
    generation: AtomicU64,
    inner: Mutex<Inner<T>>,
}

impl<T> Default for Loader<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            inner: Mutex::new(Inner {
                state: ViewState::default(),
                visible_generation: 0,
            }),
        }
    }
}

impl<T: Clone> Loader<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a load; silent loads leave the loading flag alone
    pub fn begin(&self, silent: bool) -> LoadTicket {
        let mut inner = self.lock();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.state.error = None;
        if !silent {
            inner.state.loading = true;
            inner.visible_generation = generation;
        }
        LoadTicket { generation, silent }
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Apply a result; returns `false` when the ticket was superseded
    pub fn finish(&self, ticket: LoadTicket, result: Result<T, String>) -> bool {
        let mut inner = self.lock();

        if !ticket.silent && inner.visible_generation == ticket.generation {
            inner.state.loading = false;
        }

        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            return false;
        }

        match result {
            Ok(data) => {
                inner.state.data = Some(data);
                inner.state.error = None;
                inner.state.updated_at = Some(Utc::now());
            }
            Err(message) => {
                inner.state.error = Some(message);
            }
        }
        true
    }

    /// Supersede every outstanding load
    pub fn cancel(&self) {
        let mut inner = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        inner.state.loading = false;
    }

    pub fn snapshot(&self) -> ViewState<T> {
        self.lock().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_load_wins() {
        let loader = Loader::<u32>::new();
        let first = loader.begin(false);
        let second = loader.begin(true);

        assert!(loader.finish(second, Ok(2)));
        assert!(!loader.finish(first, Ok(1)));

        let state = loader.snapshot();
        assert_eq!(state.data, Some(2));
        assert!(!state.loading);
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn test_silent_load_keeps_loading_flag() {
        let loader = Loader::<u32>::new();
        let ticket = loader.begin(true);
        assert!(!loader.snapshot().loading);
        loader.finish(ticket, Ok(1));

        let visible = loader.begin(false);
        assert!(loader.snapshot().loading);
        let silent = loader.begin(true);
        assert!(loader.finish(silent, Ok(2)));
        assert!(loader.snapshot().loading);
        assert!(!loader.finish(visible, Ok(3)));
        assert!(!loader.snapshot().loading);
        assert_eq!(loader.snapshot().data, Some(2));
    }

    #[test]
    fn test_error_keeps_previous_data() {
        let loader = Loader::<u32>::new();
        let ticket = loader.begin(false);
        loader.finish(ticket, Ok(5));

        let ticket = loader.begin(true);
        loader.finish(ticket, Err("Falha ao carregar dashboard".to_string()));

        let state = loader.snapshot();
        assert_eq!(state.data, Some(5));
        assert_eq!(state.error.as_deref(), Some("Falha ao carregar dashboard"));
    }

    #[test]
    fn test_cancel_discards_outstanding() {
        let loader = Loader::<u32>::new();
        let ticket = loader.begin(false);
        loader.cancel();
        assert!(!loader.snapshot().loading);
        assert!(!loader.is_current(&ticket));
        assert!(!loader.finish(ticket, Ok(1)));
        assert_eq!(loader.snapshot().data, None);
    }
}
