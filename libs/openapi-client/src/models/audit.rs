//! Audit log models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A single append-only audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actor: String,
    #[serde(default)]
    pub actor_type: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resource_id: String,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
