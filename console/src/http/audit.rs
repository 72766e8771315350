//! Audit log API

use openapi_client::{AuditEntry, Paginated};

use crate::http::client::{decode_or_default, ApiError, HttpClient, RequestOptions};
use crate::http::query::{ListParams, QueryParams};

/// Query of `GET /management/audit`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditListParams {
    pub list: ListParams,
    pub actor: String,
    pub action: String,
    pub resource: String,
}

impl AuditListParams {
    pub fn to_query(&self) -> QueryParams {
        self.list
            .append_to(QueryParams::new())
            .push("actor", self.actor.as_str())
            .push("action", self.action.as_str())
            .push("resource", self.resource.as_str())
    }
}

impl HttpClient {
    /// List audit entries
    pub async fn list_audit(
        &self,
        token: &str,
        params: &AuditListParams,
    ) -> Result<Paginated<AuditEntry>, ApiError> {
        let path = format!("/management/audit{}", params.to_query().to_query_string());
        decode_or_default(self.request(&path, RequestOptions::get(token)).await?)
    }
}
