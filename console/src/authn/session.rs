//! Operator session store

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::errors::ConsoleError;
use crate::filesys::file::File;
use crate::http::api::ManagementApi;
use crate::http::auth::Credentials;
use crate::http::client::ApiError;

/// Message shown when a failed sign-in carries no message of its own
pub const SIGN_IN_FALLBACK_ERROR: &str = "Falha de autenticacao";

/// Durable home of the operator token
#[async_trait]
pub trait TokenStorage: Send + Sync {
    async fn load(&self) -> Result<Option<String>, ConsoleError>;

    async fn save(&self, token: &str) -> Result<(), ConsoleError>;

    async fn clear(&self) -> Result<(), ConsoleError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    #[serde(default)]
    saved_at: Option<DateTime<Utc>>,
}

/// Token storage backed by the session file
pub struct FileTokenStorage {
    file: File,
}

impl FileTokenStorage {
    pub fn new(file: File) -> Self {
        Self { file }
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<String>, ConsoleError> {
        let stored = self.file.read_json_opt::<StoredSession>().await?;
        Ok(stored.map(|s| s.token).filter(|t| !t.is_empty()))
    }

    async fn save(&self, token: &str) -> Result<(), ConsoleError> {
        let stored = StoredSession {
            token: token.to_string(),
            saved_at: Some(Utc::now()),
        };
        self.file.write_json(&stored).await
    }

    async fn clear(&self) -> Result<(), ConsoleError> {
        self.file.delete().await
    }
}

/// Process-local token storage, used when nothing should touch disk
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<String>, ConsoleError> {
        let guard = self
            .token
            .lock()
            .map_err(|_| ConsoleError::StorageError("token storage poisoned".to_string()))?;
        Ok(guard.clone())
    }

    async fn save(&self, token: &str) -> Result<(), ConsoleError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| ConsoleError::StorageError("token storage poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), ConsoleError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| ConsoleError::StorageError("token storage poisoned".to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Observable session state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Owner of the operator token.
///
/// Every view reads the token from here and reports rejected tokens back,
/// so a 401 anywhere ends the session everywhere.
pub struct SessionStore {
    api: Arc<dyn ManagementApi>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Create a store seeded with the persisted token, if any
    pub async fn load(api: Arc<dyn ManagementApi>, storage: Arc<dyn TokenStorage>) -> Self {
        let token = match storage.load().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to load stored session, starting signed out: {}", e);
                None
            }
        };

        if token.is_some() {
            info!("Restored operator session from storage");
        }

        let (state, _) = watch::channel(SessionState {
            token,
            ..Default::default()
        });

        Self {
            api,
            storage,
            state,
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone().filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Receive every session change
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Exchange credentials for a token and adopt it
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<(), ApiError> {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = self.api.login(credentials).await;

        match result {
            Ok(response) => {
                if let Err(e) = self.storage.save(&response.token).await {
                    error!("Failed to persist session token: {}", e);
                }
                info!("Operator {} signed in", credentials.email);
                self.state.send_modify(|s| {
                    s.token = Some(response.token);
                    s.loading = false;
                });
                Ok(())
            }
            Err(e) => {
                let message = Some(e.to_string())
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SIGN_IN_FALLBACK_ERROR.to_string());
                warn!("Sign-in failed for {}: {}", credentials.email, message);
                self.state.send_modify(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
                Err(e)
            }
        }
    }

    /// Drop the token from storage and memory
    pub async fn sign_out(&self) {
        if let Err(e) = self.storage.clear().await {
            error!("Failed to clear stored session: {}", e);
        }
        self.state.send_modify(|s| {
            s.token = None;
            s.error = None;
            s.loading = false;
        });
        info!("Operator signed out");
    }

    /// Sign out when the backend rejected the token; returns whether it did
    pub async fn sign_out_if_rejected(&self, err: &ApiError) -> bool {
        if !err.is_unauthorized() {
            return false;
        }
        warn!("Backend rejected the session token, signing out");
        self.sign_out().await;
        true
    }

    /// Like [`Self::sign_out_if_rejected`], for a call made with `token`.
    ///
    /// A rejection of a token that is no longer the session token leaves the
    /// session alone.
    pub async fn sign_out_if_token_rejected(&self, err: &ApiError, token: &str) -> bool {
        if self.token().as_deref() != Some(token) {
            if err.is_unauthorized() {
                debug!("Ignoring rejection of a replaced session token");
            }
            return false;
        }
        self.sign_out_if_rejected(err).await
    }

    /// Trade the current token for a fresh one.
    ///
    /// Returns `false` when there is no session to refresh. A token that
    /// changed while the request was in flight is left untouched.
    pub async fn refresh(&self) -> Result<bool, ApiError> {
        let Some(current) = self.token() else {
            return Ok(false);
        };

        let response = match self.api.refresh_token(&current).await {
            Ok(response) => response,
            Err(e) => {
                self.sign_out_if_rejected(&e).await;
                return Err(e);
            }
        };

        if self.token().as_deref() != Some(current.as_str()) {
            debug!("Session changed during refresh, discarding refreshed token");
            return Ok(false);
        }

        if let Err(e) = self.storage.save(&response.token).await {
            error!("Failed to persist refreshed token: {}", e);
        }
        self.state.send_modify(|s| s.token = Some(response.token));
        Ok(true)
    }
}
