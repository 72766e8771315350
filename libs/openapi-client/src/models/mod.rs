//! API models

use serde::{Deserialize, Deserializer, Serialize};

pub mod audit;
pub mod auth;
pub mod deployment;
pub mod device;

pub use audit::AuditEntry;
pub use auth::{LoginRequest, TokenResponse};
pub use deployment::{Deployment, DeploymentDevice, DeploymentStats, DeploymentStatus};
pub use device::{Device, DeviceCounts, DeviceStatus, DeviceStatusUpdate};

/// Pagination block attached to every list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "default_page")]
    pub total_pages: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
            total: 0,
            total_pages: default_page(),
        }
    }
}

impl Pagination {
    /// Number of pages the client may navigate, never less than one
    pub fn page_count(&self) -> u32 {
        self.total_pages.max(1)
    }
}

/// Paginated list envelope: `{ data: [...], pagination: {...} }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            pagination: Pagination::default(),
        }
    }
}

/// Unpaginated list envelope: `{ data: [...] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct DataEnvelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

impl<T> Default for DataEnvelope<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// The backend serializes nil slices and maps as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_accepts_null_data() {
        let raw = r#"{"data": null, "pagination": {"page": 2, "per_page": 20, "total": 0, "total_pages": 0}}"#;
        let list: Paginated<Device> = serde_json::from_str(raw).unwrap();
        assert!(list.data.is_empty());
        assert_eq!(list.pagination.page, 2);
        assert_eq!(list.pagination.page_count(), 1);
    }

    #[test]
    fn test_paginated_defaults_missing_pagination() {
        let list: Paginated<AuditEntry> = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert_eq!(list.pagination, Pagination::default());
    }
}
