//! Device models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Device admission status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Pending,
    Accepted,
    Rejected,
    Decommissioned,
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    /// Statuses an operator can filter on, in display order
    pub const FILTERABLE: [DeviceStatus; 4] = [
        DeviceStatus::Pending,
        DeviceStatus::Accepted,
        DeviceStatus::Rejected,
        DeviceStatus::Decommissioned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Pending => "pending",
            DeviceStatus::Accepted => "accepted",
            DeviceStatus::Rejected => "rejected",
            DeviceStatus::Decommissioned => "decommissioned",
            DeviceStatus::Unknown => "unknown",
        }
    }

    /// Parse a known status, rejecting anything else
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(DeviceStatus::Pending),
            "accepted" => Some(DeviceStatus::Accepted),
            "rejected" => Some(DeviceStatus::Rejected),
            "decommissioned" => Some(DeviceStatus::Decommissioned),
            _ => None,
        }
    }
    /// Classify a status reported by the backend, ignoring case
    pub fn from_raw(value: &str) -> Self {
        Self::parse(&value.trim().to_lowercase()).unwrap_or(DeviceStatus::Unknown)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A managed device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_type: String,
    /// Status as reported, see [`Device::known_status`]
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub last_check_in: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub identity_data: serde_json::Map<String, serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub inventory: serde_json::Map<String, serde_json::Value>,
}

impl Device {
    pub fn known_status(&self) -> DeviceStatus {
        DeviceStatus::from_raw(&self.status)
    }
}

/// Device counts grouped by status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCounts {
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub accepted: u64,
    #[serde(default)]
    pub rejected: u64,
    #[serde(default)]
    pub decommissioned: u64,
}

impl DeviceCounts {
    pub fn total(&self) -> u64 {
        self.pending + self.accepted + self.rejected + self.decommissioned
    }
}

/// Body of `PUT /management/devices/{id}/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceStatusUpdate {
    pub status: DeviceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_tolerates_backend_nulls() {
        let raw = r#"{
            "id": "0b6f8a52-1d7e-4c1a-9a55-3a1f2b7c9d10",
            "identity_hash": "abc",
            "identity_data": {"mac": "00:11:22:33:44:55"},
            "status": "accepted",
            "inventory": null,
            "device_type": "raspberry-pi-4",
            "tags": null,
            "last_check_in": null,
            "created_at": "2025-01-01T10:00:00Z",
            "updated_at": "2025-01-02T10:00:00Z"
        }"#;
        let device: Device = serde_json::from_str(raw).unwrap();
        assert_eq!(device.known_status(), DeviceStatus::Accepted);
        assert!(device.tags.is_empty());
        assert!(device.inventory.is_empty());
        assert!(device.last_check_in.is_none());
        assert_eq!(device.identity_data["mac"], "00:11:22:33:44:55");
    }

    #[test]
    fn test_reported_status_is_kept() {
        let raw = r#"{"id": "d1", "status": "quarantined"}"#;
        let device: Device = serde_json::from_str(raw).unwrap();
        assert_eq!(device.status, "quarantined");
        assert_eq!(device.known_status(), DeviceStatus::Unknown);

        let device: Device = serde_json::from_str(r#"{"id": "d2", "status": "ACCEPTED"}"#).unwrap();
        assert_eq!(device.status, "ACCEPTED");
        assert_eq!(device.known_status(), DeviceStatus::Accepted);

        let device: Device = serde_json::from_str(r#"{"id": "d3", "status": null}"#).unwrap();
        assert_eq!(device.known_status(), DeviceStatus::Unknown);
    }

    #[test]
    fn test_counts_missing_keys_are_zero() {
        let counts: DeviceCounts = serde_json::from_str(r#"{"accepted": 3, "pending": 2}"#).unwrap();
        assert_eq!(counts.rejected, 0);
        assert_eq!(counts.total(), 5);
    }
}
