//! Main application run loop

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::app::options::{AppOptions, LifecycleOptions};
use crate::app::state::AppState;
use crate::authn::session::{FileTokenStorage, SessionStore, TokenStorage};
use crate::errors::ConsoleError;
use crate::http::api::ManagementApi;
use crate::http::client::HttpClient;
use crate::server::serve::serve;
use crate::server::state::ServerState;
use crate::workers::token_refresh;

/// Run the Harbor console
pub async fn run(
    options: AppOptions,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ConsoleError> {
    info!("Initializing Harbor Console...");

    // Create shutdown channel
    let (shutdown_tx, _shutdown_rx): (broadcast::Sender<()>, _) = broadcast::channel(1);
    let mut shutdown_manager = ShutdownManager::new(shutdown_tx.clone(), options.lifecycle.clone());

    if let Err(e) = init(&options, shutdown_tx.clone(), &mut shutdown_manager).await {
        error!("Failed to start console: {}", e);
        shutdown_manager.shutdown().await?;
        return Err(e);
    }

    shutdown_signal.await;
    info!("Shutdown signal received, shutting down...");

    drop(shutdown_tx);
    shutdown_manager.shutdown().await
}

// =============================== INITIALIZATION ================================== //

async fn init(
    options: &AppOptions,
    shutdown_tx: broadcast::Sender<()>,
    shutdown_manager: &mut ShutdownManager,
) -> Result<Arc<AppState>, ConsoleError> {
    let app_state = init_app_state(options, shutdown_manager, shutdown_tx.subscribe()).await?;

    if options.enable_token_refresh_worker {
        init_token_refresh_worker(
            app_state.session.clone(),
            options.token_refresh_worker.clone(),
            shutdown_manager,
            shutdown_tx.subscribe(),
        )
        .await?;
    }

    init_server(
        options,
        app_state.clone(),
        shutdown_manager,
        shutdown_tx.subscribe(),
    )
    .await?;

    Ok(app_state)
}

async fn init_app_state(
    options: &AppOptions,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<Arc<AppState>, ConsoleError> {
    let http_client = HttpClient::new(&options.api.base_url, options.api.request_timeout)?;
    let api: Arc<dyn ManagementApi> = Arc::new(http_client);
    let storage: Arc<dyn TokenStorage> = Arc::new(FileTokenStorage::new(
        options.storage.layout.session_file(),
    ));

    let (app_state, app_state_handle) = AppState::init(
        api,
        storage,
        options.views,
        Box::pin(async move {
            let _ = shutdown_rx.recv().await;
        }),
    )
    .await?;

    let app_state = Arc::new(app_state);
    shutdown_manager.with_app_state(app_state.clone(), app_state_handle)?;

    Ok(app_state)
}

async fn init_token_refresh_worker(
    session: Arc<SessionStore>,
    options: token_refresh::Options,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ConsoleError> {
    info!("Initializing token refresh worker...");

    // Catch a token that is already close to expiry before the first tick
    token_refresh::check_once(&options, &session).await;

    let token_refresh_handle = tokio::spawn(async move {
        token_refresh::run(
            &options,
            session.as_ref(),
            |wait| tokio::time::sleep(wait),
            Box::pin(async move {
                let _ = shutdown_rx.recv().await;
            }),
        )
        .await;
    });

    shutdown_manager.with_token_refresh_worker_handle(token_refresh_handle)?;
    Ok(())
}

async fn init_server(
    options: &AppOptions,
    app_state: Arc<AppState>,
    shutdown_manager: &mut ShutdownManager,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), ConsoleError> {
    info!("Initializing console HTTP server...");

    let server_state = ServerState::new(&app_state);

    let server_handle = serve(&options.server, Arc::new(server_state), async move {
        let _ = shutdown_rx.recv().await;
    })
    .await?;

    shutdown_manager.with_server_handle(server_handle)?;
    Ok(())
}

// ================================= SHUTDOWN ===================================== //

struct AppStateShutdownParams {
    state: Arc<AppState>,
    state_handle: Pin<Box<dyn Future<Output = ()> + Send>>,
}

struct ShutdownManager {
    shutdown_tx: broadcast::Sender<()>,
    lifecycle_options: LifecycleOptions,
    app_state: Option<AppStateShutdownParams>,
    server_handle: Option<JoinHandle<Result<(), ConsoleError>>>,
    token_refresh_worker_handle: Option<JoinHandle<()>>,
}

impl ShutdownManager {
    pub fn new(shutdown_tx: broadcast::Sender<()>, lifecycle_options: LifecycleOptions) -> Self {
        Self {
            shutdown_tx,
            lifecycle_options,
            app_state: None,
            server_handle: None,
            token_refresh_worker_handle: None,
        }
    }

    pub fn with_app_state(
        &mut self,
        state: Arc<AppState>,
        state_handle: JoinHandle<()>,
    ) -> Result<(), ConsoleError> {
        if self.app_state.is_some() {
            return Err(ConsoleError::ShutdownError("app_state already set".to_string()));
        }
        self.app_state = Some(AppStateShutdownParams {
            state,
            state_handle: Box::pin(async move {
                if let Err(e) = state_handle.await {
                    error!("Session watcher ended abnormally: {}", e);
                }
            }),
        });
        Ok(())
    }

    pub fn with_token_refresh_worker_handle(
        &mut self,
        handle: JoinHandle<()>,
    ) -> Result<(), ConsoleError> {
        if self.token_refresh_worker_handle.is_some() {
            return Err(ConsoleError::ShutdownError(
                "token_refresh_handle already set".to_string(),
            ));
        }
        self.token_refresh_worker_handle = Some(handle);
        Ok(())
    }

    pub fn with_server_handle(
        &mut self,
        handle: JoinHandle<Result<(), ConsoleError>>,
    ) -> Result<(), ConsoleError> {
        if self.server_handle.is_some() {
            return Err(ConsoleError::ShutdownError("server_handle already set".to_string()));
        }
        self.server_handle = Some(handle);
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), ConsoleError> {
        let _ = self.shutdown_tx.send(());

        match tokio::time::timeout(
            self.lifecycle_options.max_shutdown_delay,
            self.shutdown_impl(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                error!(
                    "Shutdown timed out after {:?}, forcing shutdown...",
                    self.lifecycle_options.max_shutdown_delay
                );
                std::process::exit(1);
            }
        }
    }

    async fn shutdown_impl(&mut self) -> Result<(), ConsoleError> {
        info!("Shutting down Harbor Console...");

        // 1. Token refresh worker
        if let Some(handle) = self.token_refresh_worker_handle.take() {
            handle
                .await
                .map_err(|e| ConsoleError::ShutdownError(e.to_string()))?;
        }

        // 2. HTTP server
        if let Some(handle) = self.server_handle.take() {
            handle
                .await
                .map_err(|e| ConsoleError::ShutdownError(e.to_string()))??;
        }

        // 3. App state
        if let Some(app_state) = self.app_state.take() {
            app_state.state.shutdown().await?;
            app_state.state_handle.await;
        }

        info!("Shutdown complete");
        Ok(())
    }
}
