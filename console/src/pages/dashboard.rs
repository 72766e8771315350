//! Real-time overview

use std::sync::Arc;

use openapi_client::{AuditEntry, Deployment, DeploymentStats, Device, DeviceCounts};

use crate::authn::session::SessionStore;
use crate::components::charts::{render_bar_list, render_donut, ChartItem};
use crate::components::html::{escape, inline_error, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::components::stat_card::StatCard;
use crate::components::status_pill;
use crate::http::api::ManagementApi;
use crate::http::audit::AuditListParams;
use crate::http::client::ApiError;
use crate::http::deployments::DeploymentListParams;
use crate::http::devices::DeviceListParams;
use crate::http::query::ListParams;
use crate::pages::views::{refresh_controls, Fetch, LiveView};
use crate::sync::loader::ViewState;
use crate::utils::{format_timestamp, or_dash, shorten_id, DEFAULT_ID_PREFIX};

pub const PATH: &str = "/dashboard";
pub const LOAD_ERROR: &str = "Falha ao carregar dashboard";
pub const DEFAULT_REFRESH_MS: u64 = 15_000;
const LATEST: u32 = 5;

pub type DashboardView = LiveView<DashboardSnapshot>;

/// Everything the overview shows, fetched together
#[derive(Debug, Clone, Default)]
pub struct DashboardSnapshot {
    pub device_counts: DeviceCounts,
    pub deployment_stats: DeploymentStats,
    pub latest_deployments: Vec<Deployment>,
    pub latest_devices: Vec<Device>,
    pub latest_audit: Vec<AuditEntry>,
}

impl DashboardSnapshot {
    /// Issue the five overview requests concurrently; any failure fails the
    /// whole snapshot
    pub async fn fetch(api: &dyn ManagementApi, token: &str) -> Result<Self, ApiError> {
        let latest = ListParams::latest(LATEST);
        let devices = DeviceListParams {
            list: latest,
            ..Default::default()
        };
        let deployments = DeploymentListParams {
            list: latest,
            ..Default::default()
        };
        let audit = AuditListParams {
            list: latest,
            ..Default::default()
        };

        let (device_counts, deployment_stats, deployments, devices, audit) = tokio::try_join!(
            api.device_counts(token),
            api.deployment_stats(token),
            api.list_deployments(token, &deployments),
            api.list_devices(token, &devices),
            api.list_audit(token, &audit),
        )?;

        Ok(Self {
            device_counts,
            deployment_stats,
            latest_deployments: deployments.data,
            latest_devices: devices.data,
            latest_audit: audit.data,
        })
    }

    pub fn cards(&self) -> [StatCard; 4] {
        let counts = &self.device_counts;
        let stats = &self.deployment_stats;
        [
            StatCard::new("Devices Totais", counts.total(), format!("{} pendentes", counts.pending)),
            StatCard::new("Devices Aceitos", counts.accepted, format!("{} rejeitados", counts.rejected)),
            StatCard::new("Deployments Totais", stats.total, format!("{} ativos", stats.active)),
            StatCard::new(
                "Deployments Completos",
                stats.completed,
                format!("{} cancelados", stats.cancelled),
            ),
        ]
    }

    pub fn device_distribution(&self) -> Vec<ChartItem> {
        let counts = &self.device_counts;
        vec![
            ChartItem::new("accepted", counts.accepted),
            ChartItem::new("pending", counts.pending),
            ChartItem::new("rejected", counts.rejected),
            ChartItem::new("decommissioned", counts.decommissioned),
        ]
    }

    pub fn deployment_bars(&self) -> Vec<ChartItem> {
        let stats = &self.deployment_stats;
        vec![
            ChartItem::new("scheduled", stats.scheduled),
            ChartItem::new("active", stats.active),
            ChartItem::new("completed", stats.completed),
            ChartItem::new("cancelled", stats.cancelled),
        ]
    }
}

pub fn fetcher(api: Arc<dyn ManagementApi>) -> Fetch<DashboardSnapshot> {
    Arc::new(move |token| {
        let api = api.clone();
        Box::pin(async move { DashboardSnapshot::fetch(api.as_ref(), &token).await })
    })
}

pub fn open(api: Arc<dyn ManagementApi>, session: Arc<SessionStore>, refresh_ms: u64) -> DashboardView {
    LiveView::open(session, fetcher(api), LOAD_ERROR, refresh_ms)
}

pub fn render(state: &ViewState<DashboardSnapshot>, refresh_ms: u64, reload_secs: Option<u64>) -> String {
    let empty = DashboardSnapshot::default();
    let snapshot = state.data.as_ref().unwrap_or(&empty);

    let cards: String = snapshot.cards().iter().map(StatCard::render).collect();

    let deployment_rows: String = snapshot
        .latest_deployments
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td><a href="/deployments/{}">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                path_segment(&item.id),
                escape(&item.name),
                status_pill::render(Some(&item.status)),
                format_timestamp(item.created_at.as_ref()),
            )
        })
        .collect();

    let device_rows: String = snapshot
        .latest_devices
        .iter()
        .map(|item| {
            format!(
                r#"<tr><td><a href="/devices/{}" class="mono">{}</a></td><td>{}</td><td>{}</td></tr>"#,
                path_segment(&item.id),
                escape(&shorten_id(&item.id, DEFAULT_ID_PREFIX)),
                escape(or_dash(&item.device_type)),
                status_pill::render(Some(&item.status)),
            )
        })
        .collect();

    let timeline: String = snapshot
        .latest_audit
        .iter()
        .map(|entry| {
            format!(
                r#"<li><p><strong>{}</strong> executou <strong>{}</strong></p><p class="muted">{} | {} | {}</p></li>"#,
                escape(&entry.actor),
                escape(&entry.action),
                escape(&entry.resource),
                escape(&shorten_id(&entry.resource_id, 12)),
                format_timestamp(entry.created_at.as_ref()),
            )
        })
        .collect();

    let body = format!(
        r#"{error}<section class="stats-grid">{cards}</section><section class="panel-grid">{donut}{bars}</section><section class="panel-grid"><article class="panel"><div class="panel__header"><h3>Ultimos Deployments</h3><a href="/deployments" class="inline-link">Ver todos</a></div><div class="table-wrap"><table><thead><tr><th>Nome</th><th>Status</th><th>Criado em</th></tr></thead><tbody>{deployment_rows}</tbody></table></div></article><article class="panel"><div class="panel__header"><h3>Ultimos Devices</h3><a href="/devices" class="inline-link">Ver todos</a></div><div class="table-wrap"><table><thead><tr><th>ID</th><th>Tipo</th><th>Status</th></tr></thead><tbody>{device_rows}</tbody></table></div></article></section><article class="panel"><div class="panel__header"><h3>Auditoria Recente</h3><a href="/audit" class="inline-link">Abrir auditoria</a></div><ul class="timeline">{timeline}</ul></article>"#,
        error = inline_error(state.error.as_deref()),
        donut = render_donut("Distribuicao de Devices", &snapshot.device_distribution()),
        bars = render_bar_list("Status de Deployments", &snapshot.deployment_bars()),
    );

    Shell::new("Panorama em Tempo Real", NavItem::Dashboard)
        .subtitle(format!(
            "Ultima atualizacao: {}",
            format_timestamp(state.updated_at.as_ref())
        ))
        .actions(refresh_controls(PATH, refresh_ms, state.loading))
        .refresh_every(reload_secs)
        .render(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot {
            device_counts: DeviceCounts {
                pending: 2,
                accepted: 5,
                rejected: 1,
                decommissioned: 0,
            },
            deployment_stats: DeploymentStats {
                total: 7,
                scheduled: 1,
                active: 2,
                completed: 3,
                cancelled: 1,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_cards() {
        let cards = snapshot().cards();
        assert_eq!(cards[0], StatCard::new("Devices Totais", 8, "2 pendentes"));
        assert_eq!(cards[1], StatCard::new("Devices Aceitos", 5, "1 rejeitados"));
        assert_eq!(cards[2], StatCard::new("Deployments Totais", 7, "2 ativos"));
        assert_eq!(cards[3], StatCard::new("Deployments Completos", 3, "1 cancelados"));
    }

    #[test]
    fn test_chart_order() {
        let labels: Vec<String> = snapshot()
            .device_distribution()
            .into_iter()
            .map(|i| i.label)
            .collect();
        assert_eq!(labels, ["accepted", "pending", "rejected", "decommissioned"]);

        let bars = snapshot().deployment_bars();
        assert_eq!(bars[0], ChartItem::new("scheduled", 1));
        assert_eq!(bars[3], ChartItem::new("cancelled", 1));
    }

    #[test]
    fn test_render_before_first_load() {
        let state = ViewState::<DashboardSnapshot>::default();
        let html = render(&state, DEFAULT_REFRESH_MS, Some(15));

        assert!(html.contains("Ultima atualizacao: -"));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="15">"#));
        assert!(html.contains("Devices Totais"));
    }

    #[test]
    fn test_render_error_keeps_data() {
        let state = ViewState {
            data: Some(snapshot()),
            loading: false,
            error: Some(LOAD_ERROR.to_string()),
            updated_at: None,
        };
        let html = render(&state, 0, None);
        assert!(html.contains(LOAD_ERROR));
        assert!(html.contains("2 pendentes"));
        assert!(!html.contains("http-equiv"));
    }
}
