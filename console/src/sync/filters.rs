//! Resource filters of the list views

use crate::http::audit::AuditListParams;
use crate::http::deployments::DeploymentListParams;
use crate::http::devices::DeviceListParams;
use crate::http::query::ListParams;
use crate::sync::query_state::QueryMap;

/// Subtitle of a list page without active filters
pub const NO_ACTIVE_FILTERS: &str = "Sem filtros ativos";

/// Filter model stored in the URL query
pub trait Filters: Clone + Default + PartialEq + Send + Sync + 'static {
    /// Request parameters sent to the management API
    type Params;

    fn from_query(query: &QueryMap) -> Self;

    /// Every filter key with its current value, in URL order
    fn fields(&self) -> Vec<(&'static str, String)>;

    /// Label shown for a key in the summary
    fn summary_label(key: &'static str) -> &'static str {
        key
    }

    fn to_params(&self, list: ListParams) -> Self::Params;

    /// `key=value | key=value`, or a placeholder without active filters
    fn summary(&self) -> String {
        let active: Vec<String> = self
            .fields()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{}={}", Self::summary_label(key), value))
            .collect();

        if active.is_empty() {
            NO_ACTIVE_FILTERS.to_string()
        } else {
            active.join(" | ")
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceFilters {
    pub status: String,
    pub device_type: String,
    /// Comma separated tags, as typed in the form
    pub tag: String,
}

impl DeviceFilters {
    /// Tags split on commas, trimmed, empties dropped
    pub fn tags(&self) -> Vec<String> {
        self.tag
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Filters for DeviceFilters {
    type Params = DeviceListParams;

    fn from_query(query: &QueryMap) -> Self {
        Self {
            status: query.get("status").to_string(),
            device_type: query.get("device_type").to_string(),
            tag: query.get("tag").to_string(),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("status", self.status.clone()),
            ("device_type", self.device_type.clone()),
            ("tag", self.tag.clone()),
        ]
    }

    fn summary_label(key: &'static str) -> &'static str {
        match key {
            "tag" => "tags",
            other => other,
        }
    }

    fn to_params(&self, list: ListParams) -> DeviceListParams {
        DeviceListParams {
            list,
            status: self.status.clone(),
            device_type: self.device_type.clone(),
            tags: self.tags(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentFilters {
    pub status: String,
}

impl Filters for DeploymentFilters {
    type Params = DeploymentListParams;

    fn from_query(query: &QueryMap) -> Self {
        Self {
            status: query.get("status").to_string(),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![("status", self.status.clone())]
    }

    fn to_params(&self, list: ListParams) -> DeploymentListParams {
        DeploymentListParams {
            list,
            status: self.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditFilters {
    pub actor: String,
    pub action: String,
    pub resource: String,
}

impl Filters for AuditFilters {
    type Params = AuditListParams;

    fn from_query(query: &QueryMap) -> Self {
        Self {
            actor: query.get("actor").to_string(),
            action: query.get("action").to_string(),
            resource: query.get("resource").to_string(),
        }
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("actor", self.actor.clone()),
            ("action", self.action.clone()),
            ("resource", self.resource.clone()),
        ]
    }

    fn to_params(&self, list: ListParams) -> AuditListParams {
        AuditListParams {
            list,
            actor: self.actor.clone(),
            action: self.action.clone(),
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_tags_split() {
        let filters = DeviceFilters {
            tag: " production, ,rack-01 ,".to_string(),
            ..Default::default()
        };
        assert_eq!(filters.tags(), vec!["production", "rack-01"]);

        let params = filters.to_params(ListParams::page(1, 20));
        assert_eq!(
            params.to_query().to_query_string(),
            "?page=1&per_page=20&order=desc&tag=production&tag=rack-01"
        );
    }

    #[test]
    fn test_summaries() {
        assert_eq!(DeviceFilters::default().summary(), NO_ACTIVE_FILTERS);

        let filters = DeviceFilters {
            status: "accepted".to_string(),
            device_type: String::new(),
            tag: "edge".to_string(),
        };
        assert_eq!(filters.summary(), "status=accepted | tags=edge");

        let filters = AuditFilters {
            actor: "admin".to_string(),
            action: "deployment.create".to_string(),
            resource: String::new(),
        };
        assert_eq!(filters.summary(), "actor=admin | action=deployment.create");
    }

    #[test]
    fn test_from_query_defaults_to_empty() {
        let query = QueryMap::parse(Some("page=2"));
        assert_eq!(DeploymentFilters::from_query(&query), DeploymentFilters::default());
    }
}
