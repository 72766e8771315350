//! Device management API

use http::Method;
use openapi_client::{Device, DeviceCounts, DeviceStatus, DeviceStatusUpdate, Paginated};

use crate::http::client::{
    decode_or_default, decode_required, ApiError, HttpClient, RequestOptions,
};
use crate::http::query::{path_segment, ListParams, QueryParams};

/// Query of `GET /management/devices`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceListParams {
    pub list: ListParams,
    pub status: String,
    pub device_type: String,
    pub tags: Vec<String>,
}

impl DeviceListParams {
    pub fn to_query(&self) -> QueryParams {
        self.list
            .append_to(QueryParams::new())
            .push("status", self.status.as_str())
            .push("device_type", self.device_type.as_str())
            .push_all("tag", &self.tags)
    }
}

impl HttpClient {
    /// Device counts grouped by status
    pub async fn device_counts(&self, token: &str) -> Result<DeviceCounts, ApiError> {
        decode_or_default(
            self.request("/management/devices/count", RequestOptions::get(token))
                .await?,
        )
    }

    /// List devices
    pub async fn list_devices(
        &self,
        token: &str,
        params: &DeviceListParams,
    ) -> Result<Paginated<Device>, ApiError> {
        let path = format!("/management/devices{}", params.to_query().to_query_string());
        decode_or_default(self.request(&path, RequestOptions::get(token)).await?)
    }

    /// Get a single device
    pub async fn get_device(&self, token: &str, id: &str) -> Result<Device, ApiError> {
        let path = format!("/management/devices/{}", path_segment(id));
        decode_required(self.request(&path, RequestOptions::get(token)).await?)
    }

    /// Request a device status transition
    pub async fn update_device_status(
        &self,
        token: &str,
        id: &str,
        status: DeviceStatus,
    ) -> Result<(), ApiError> {
        let path = format!("/management/devices/{}/status", path_segment(id));
        let body = serde_json::to_value(DeviceStatusUpdate { status })
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        let options = RequestOptions::get(token)
            .with_method(Method::PUT)
            .with_json(body);
        self.request(&path, options).await?;
        Ok(())
    }
}
