//! Deployment models

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Deployment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    pub const FILTERABLE: [DeploymentStatus; 4] = [
        DeploymentStatus::Scheduled,
        DeploymentStatus::Active,
        DeploymentStatus::Completed,
        DeploymentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Scheduled => "scheduled",
            DeploymentStatus::Active => "active",
            DeploymentStatus::Completed => "completed",
            DeploymentStatus::Cancelled => "cancelled",
            DeploymentStatus::Unknown => "unknown",
        }
    }

    /// Classify a status reported by the backend, ignoring case
    pub fn from_raw(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "scheduled" => DeploymentStatus::Scheduled,
            "active" => DeploymentStatus::Active,
            "completed" => DeploymentStatus::Completed,
            "cancelled" => DeploymentStatus::Cancelled,
            _ => DeploymentStatus::Unknown,
        }
    }

    /// Cancellation is only accepted before the deployment has finished
    pub fn can_cancel(&self) -> bool {
        matches!(self, DeploymentStatus::Scheduled | DeploymentStatus::Active)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An artifact rollout to a set of devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Status as reported, see [`Deployment::known_status`]
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifact_id: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_parallel: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_device_ids: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_device_tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub target_device_types: Vec<String>,
}

impl Deployment {
    pub fn known_status(&self) -> DeploymentStatus {
        DeploymentStatus::from_raw(&self.status)
    }

    pub fn can_cancel(&self) -> bool {
        self.known_status().can_cancel()
    }
}

/// Join record between a deployment and one of its target devices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentDevice {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_id: String,
    /// Execution status as reported (pending, downloading, success, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub log: String,
}

/// Aggregate deployment counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub scheduled: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub cancelled: u64,
}
