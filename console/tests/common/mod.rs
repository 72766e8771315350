//! Shared fixtures for the console integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use harbor_console::app::options::ViewOptions;
use harbor_console::app::state::AppState;
use harbor_console::authn::session::{MemoryTokenStorage, SessionStore, TokenStorage};
use harbor_console::http::api::ManagementApi;
use harbor_console::http::audit::AuditListParams;
use harbor_console::http::auth::Credentials;
use harbor_console::http::client::ApiError;
use harbor_console::http::deployments::DeploymentListParams;
use harbor_console::http::devices::DeviceListParams;
use harbor_console::server::serve::router;
use harbor_console::server::state::ServerState;
use openapi_client::{
    AuditEntry, Deployment, DeploymentDevice, DeploymentStats, Device, DeviceCounts, DeviceStatus,
    Paginated, Pagination, TokenResponse,
};
use serde_json::json;
use tower::ServiceExt;

pub const TOKEN: &str = "operator-token";
pub const PASSWORD: &str = "admin";
pub const REFRESHED_TOKEN: &str = "refreshed-token";

/// In-memory management API recording every call
#[derive(Default)]
pub struct FakeApi {
    pub calls: Mutex<Vec<String>>,
    /// Every token-bearing call answers 401
    pub reject_tokens: Mutex<bool>,
    /// `total_pages` reported by the deployment list
    pub deployment_pages: Mutex<u32>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            deployment_pages: Mutex::new(1),
            ..Default::default()
        })
    }

    pub fn reject_tokens(&self) {
        *self.reject_tokens.lock().unwrap() = true;
    }

    pub fn set_deployment_pages(&self, pages: u32) {
        *self.deployment_pages.lock().unwrap() = pages;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: impl Into<String>, token: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.into());
        if *self.reject_tokens.lock().unwrap() || token.is_empty() {
            return Err(ApiError::Status {
                status: 401,
                message: "invalid token".to_string(),
            });
        }
        Ok(())
    }
}

pub fn device(id: &str, status: &str) -> Device {
    serde_json::from_value(json!({
        "id": id,
        "device_type": "raspberry-pi-4",
        "status": status,
        "tags": ["rack-01"],
        "identity_data": {"mac": "00:11:22:33:44:55"},
    }))
    .unwrap()
}

pub fn deployment(id: &str, status: &str) -> Deployment {
    serde_json::from_value(json!({
        "id": id,
        "name": format!("rollout {}", id),
        "status": status,
        "artifact_id": "artifact-1",
        "max_parallel": 5,
        "target_device_tags": ["rack-01"],
    }))
    .unwrap()
}

fn page_of<T>(data: Vec<T>, page: u32, total_pages: u32) -> Paginated<T> {
    let total = data.len() as u64;
    Paginated {
        data,
        pagination: Pagination {
            page,
            per_page: 20,
            total,
            total_pages,
        },
    }
}

#[async_trait]
impl ManagementApi for FakeApi {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        use secrecy::ExposeSecret;

        self.calls.lock().unwrap().push("login".to_string());
        if credentials.password.expose_secret() != PASSWORD {
            return Err(ApiError::Status {
                status: 401,
                message: "invalid credentials".to_string(),
            });
        }
        *self.reject_tokens.lock().unwrap() = false;
        Ok(TokenResponse {
            token: TOKEN.to_string(),
            expires_at: None,
        })
    }

    async fn refresh_token(&self, token: &str) -> Result<TokenResponse, ApiError> {
        self.record("refresh_token", token)?;
        Ok(TokenResponse {
            token: REFRESHED_TOKEN.to_string(),
            expires_at: None,
        })
    }

    async fn device_counts(&self, token: &str) -> Result<DeviceCounts, ApiError> {
        self.record("device_counts", token)?;
        Ok(DeviceCounts {
            pending: 2,
            accepted: 7,
            rejected: 1,
            decommissioned: 0,
        })
    }

    async fn list_devices(
        &self,
        token: &str,
        params: &DeviceListParams,
    ) -> Result<Paginated<Device>, ApiError> {
        self.record(format!("list_devices:{}", params.list.page), token)?;
        Ok(page_of(
            vec![device("dev-1", "pending"), device("dev-2", "accepted")],
            params.list.page,
            1,
        ))
    }

    async fn get_device(&self, token: &str, id: &str) -> Result<Device, ApiError> {
        self.record(format!("get_device:{}", id), token)?;
        Ok(device(id, "pending"))
    }

    async fn update_device_status(
        &self,
        token: &str,
        id: &str,
        status: DeviceStatus,
    ) -> Result<(), ApiError> {
        self.record(format!("update_device_status:{}:{}", id, status.as_str()), token)
    }

    async fn list_deployments(
        &self,
        token: &str,
        params: &DeploymentListParams,
    ) -> Result<Paginated<Deployment>, ApiError> {
        self.record(
            format!("list_deployments:{}:{}", params.status, params.list.page),
            token,
        )?;
        let total_pages = *self.deployment_pages.lock().unwrap();
        Ok(page_of(
            vec![deployment("dep-1", "active")],
            params.list.page,
            total_pages,
        ))
    }

    async fn get_deployment(&self, token: &str, id: &str) -> Result<Deployment, ApiError> {
        self.record(format!("get_deployment:{}", id), token)?;
        Ok(deployment(id, "active"))
    }

    async fn deployment_devices(
        &self,
        token: &str,
        id: &str,
    ) -> Result<Vec<DeploymentDevice>, ApiError> {
        self.record(format!("deployment_devices:{}", id), token)?;
        Ok(Vec::new())
    }

    async fn deployment_stats(&self, token: &str) -> Result<DeploymentStats, ApiError> {
        self.record("deployment_stats", token)?;
        Ok(DeploymentStats {
            total: 3,
            scheduled: 0,
            active: 1,
            completed: 2,
            cancelled: 0,
        })
    }

    async fn cancel_deployment(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.record(format!("cancel_deployment:{}", id), token)
    }

    async fn list_audit(
        &self,
        token: &str,
        params: &AuditListParams,
    ) -> Result<Paginated<AuditEntry>, ApiError> {
        self.record(format!("list_audit:{}", params.list.page), token)?;
        Ok(page_of(Vec::new(), params.list.page, 0))
    }
}

/// Console router over `api`, signed in when `token` is given
pub async fn console(api: Arc<FakeApi>, token: Option<&str>) -> (Router, Arc<ServerState>) {
    let storage: Arc<dyn TokenStorage> = match token {
        Some(token) => Arc::new(MemoryTokenStorage::with_token(token)),
        None => Arc::new(MemoryTokenStorage::default()),
    };
    let api: Arc<dyn ManagementApi> = api;
    let session = Arc::new(SessionStore::load(api.clone(), storage).await);
    let app_state = AppState::new(api, session, ViewOptions::default());
    let state = Arc::new(ServerState::new(&app_state));
    (router(state.clone()), state)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: &Router, uri: &str, form: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn assert_status(response: &Response<Body>, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status for response");
}
