//! Deployment management API

use http::Method;
use openapi_client::{DataEnvelope, Deployment, DeploymentDevice, DeploymentStats, Paginated};

use crate::http::client::{
    decode_or_default, decode_required, ApiError, HttpClient, RequestOptions,
};
use crate::http::query::{path_segment, ListParams, QueryParams};

/// Query of `GET /management/deployments`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentListParams {
    pub list: ListParams,
    pub status: String,
}

impl DeploymentListParams {
    pub fn to_query(&self) -> QueryParams {
        self.list
            .append_to(QueryParams::new())
            .push("status", self.status.as_str())
    }
}

impl HttpClient {
    /// List deployments
    pub async fn list_deployments(
        &self,
        token: &str,
        params: &DeploymentListParams,
    ) -> Result<Paginated<Deployment>, ApiError> {
        let path = format!(
            "/management/deployments{}",
            params.to_query().to_query_string()
        );
        decode_or_default(self.request(&path, RequestOptions::get(token)).await?)
    }

    /// Get a single deployment
    pub async fn get_deployment(&self, token: &str, id: &str) -> Result<Deployment, ApiError> {
        let path = format!("/management/deployments/{}", path_segment(id));
        decode_required(self.request(&path, RequestOptions::get(token)).await?)
    }

    /// Per-device execution records of a deployment
    pub async fn deployment_devices(
        &self,
        token: &str,
        id: &str,
    ) -> Result<Vec<DeploymentDevice>, ApiError> {
        let path = format!("/management/deployments/{}/devices", path_segment(id));
        let envelope: DataEnvelope<DeploymentDevice> =
            decode_or_default(self.request(&path, RequestOptions::get(token)).await?)?;
        Ok(envelope.data)
    }

    /// Aggregate deployment statistics
    pub async fn deployment_stats(&self, token: &str) -> Result<DeploymentStats, ApiError> {
        decode_or_default(
            self.request("/management/deployments/statistics", RequestOptions::get(token))
                .await?,
        )
    }

    /// Cancel a scheduled or active deployment
    pub async fn cancel_deployment(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let path = format!("/management/deployments/{}/cancel", path_segment(id));
        let options = RequestOptions::get(token).with_method(Method::POST);
        self.request(&path, options).await?;
        Ok(())
    }
}
