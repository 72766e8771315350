//! Management API seam used by the session store and the views

use async_trait::async_trait;
use openapi_client::{
    AuditEntry, Deployment, DeploymentDevice, DeploymentStats, Device, DeviceCounts, DeviceStatus,
    Paginated, TokenResponse,
};

use crate::http::audit::AuditListParams;
use crate::http::auth::Credentials;
use crate::http::client::{ApiError, HttpClient};
use crate::http::deployments::DeploymentListParams;
use crate::http::devices::DeviceListParams;

/// Every backend capability the console relies on
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError>;

    async fn refresh_token(&self, token: &str) -> Result<TokenResponse, ApiError>;

    async fn device_counts(&self, token: &str) -> Result<DeviceCounts, ApiError>;

    async fn list_devices(
        &self,
        token: &str,
        params: &DeviceListParams,
    ) -> Result<Paginated<Device>, ApiError>;

    async fn get_device(&self, token: &str, id: &str) -> Result<Device, ApiError>;

    async fn update_device_status(
        &self,
        token: &str,
        id: &str,
        status: DeviceStatus,
    ) -> Result<(), ApiError>;

    async fn list_deployments(
        &self,
        token: &str,
        params: &DeploymentListParams,
    ) -> Result<Paginated<Deployment>, ApiError>;

    async fn get_deployment(&self, token: &str, id: &str) -> Result<Deployment, ApiError>;

    async fn deployment_devices(
        &self,
        token: &str,
        id: &str,
    ) -> Result<Vec<DeploymentDevice>, ApiError>;

    async fn deployment_stats(&self, token: &str) -> Result<DeploymentStats, ApiError>;

    async fn cancel_deployment(&self, token: &str, id: &str) -> Result<(), ApiError>;

    async fn list_audit(
        &self,
        token: &str,
        params: &AuditListParams,
    ) -> Result<Paginated<AuditEntry>, ApiError>;
}

#[async_trait]
impl ManagementApi for HttpClient {
    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        HttpClient::login(self, credentials).await
    }

    async fn refresh_token(&self, token: &str) -> Result<TokenResponse, ApiError> {
        HttpClient::refresh_token(self, token).await
    }

    async fn device_counts(&self, token: &str) -> Result<DeviceCounts, ApiError> {
        HttpClient::device_counts(self, token).await
    }

    async fn list_devices(
        &self,
        token: &str,
        params: &DeviceListParams,
    ) -> Result<Paginated<Device>, ApiError> {
        HttpClient::list_devices(self, token, params).await
    }

    async fn get_device(&self, token: &str, id: &str) -> Result<Device, ApiError> {
        HttpClient::get_device(self, token, id).await
    }

    async fn update_device_status(
        &self,
        token: &str,
        id: &str,
        status: DeviceStatus,
    ) -> Result<(), ApiError> {
        HttpClient::update_device_status(self, token, id, status).await
    }

    async fn list_deployments(
        &self,
        token: &str,
        params: &DeploymentListParams,
    ) -> Result<Paginated<Deployment>, ApiError> {
        HttpClient::list_deployments(self, token, params).await
    }

    async fn get_deployment(&self, token: &str, id: &str) -> Result<Deployment, ApiError> {
        HttpClient::get_deployment(self, token, id).await
    }

    async fn deployment_devices(
        &self,
        token: &str,
        id: &str,
    ) -> Result<Vec<DeploymentDevice>, ApiError> {
        HttpClient::deployment_devices(self, token, id).await
    }

    async fn deployment_stats(&self, token: &str) -> Result<DeploymentStats, ApiError> {
        HttpClient::deployment_stats(self, token).await
    }

    async fn cancel_deployment(&self, token: &str, id: &str) -> Result<(), ApiError> {
        HttpClient::cancel_deployment(self, token, id).await
    }

    async fn list_audit(
        &self,
        token: &str,
        params: &AuditListParams,
    ) -> Result<Paginated<AuditEntry>, ApiError> {
        HttpClient::list_audit(self, token, params).await
    }
}
