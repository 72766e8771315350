//! Deployment detail with per-device progress

use std::sync::Arc;

use openapi_client::{Deployment, DeploymentDevice};

use crate::authn::session::SessionStore;
use crate::components::charts::{render_bar_list, ChartItem};
use crate::components::html::{escape, inline_error, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::components::stat_card::{render_raw, render_small};
use crate::components::status_pill;
use crate::http::api::ManagementApi;
use crate::http::client::ApiError;
use crate::pages::actions::cancel_url;
use crate::pages::flash::{render_all, Flash};
use crate::pages::views::{refresh_controls, Fetch, LiveView};
use crate::sync::loader::ViewState;
use crate::utils::{format_timestamp, join_or_dash, or_dash, shorten_id, DEFAULT_ID_PREFIX};

pub const LOAD_ERROR: &str = "Falha ao carregar deployment";
pub const DEFAULT_REFRESH_MS: u64 = 30_000;

pub type DeploymentDetailView = LiveView<DeploymentDetail>;

#[derive(Debug, Clone)]
pub struct DeploymentDetail {
    pub deployment: Deployment,
    pub devices: Vec<DeploymentDevice>,
}

impl DeploymentDetail {
    pub async fn fetch(api: &dyn ManagementApi, token: &str, id: &str) -> Result<Self, ApiError> {
        let (deployment, devices) =
            tokio::try_join!(api.get_deployment(token, id), api.deployment_devices(token, id))?;
        Ok(Self { deployment, devices })
    }

    /// Device count per execution status, in order of first appearance
    pub fn status_distribution(&self) -> Vec<ChartItem> {
        let mut items: Vec<ChartItem> = Vec::new();
        for device in &self.devices {
            let label = match device.status.as_str() {
                "" => "unknown",
                status => status,
            };
            match items.iter_mut().find(|i| i.label == label) {
                Some(item) => item.value += 1,
                None => items.push(ChartItem::new(label, 1)),
            }
        }
        items
    }
}

pub fn path(id: &str) -> String {
    format!("/deployments/{}", path_segment(id))
}

pub fn open(
    api: Arc<dyn ManagementApi>,
    session: Arc<SessionStore>,
    id: &str,
    refresh_ms: u64,
) -> DeploymentDetailView {
    let id = id.to_string();
    let fetch: Fetch<DeploymentDetail> = Arc::new(move |token| {
        let api = api.clone();
        let id = id.clone();
        Box::pin(async move { DeploymentDetail::fetch(api.as_ref(), &token, &id).await })
    });
    LiveView::open(session, fetch, LOAD_ERROR, refresh_ms)
}

pub fn render(
    id: &str,
    state: &ViewState<DeploymentDetail>,
    refresh_ms: u64,
    reload_secs: Option<u64>,
    flashes: &[Flash],
) -> String {
    let detail = state.data.as_ref();
    let deployment = detail.map(|d| &d.deployment);
    let base = path(id);

    let cancel = match deployment {
        Some(deployment) if deployment.can_cancel() => format!(
            r#"<a class="button-link danger" href="{}">Cancelar</a>"#,
            escape(&cancel_url(id, &base))
        ),
        _ => String::new(),
    };
    let actions = format!(
        r#"{}{}<a href="/deployments" class="button-link">Voltar</a>"#,
        refresh_controls(&base, refresh_ms, state.loading),
        cancel
    );

    let cards = deployment
        .map(|deployment| {
            format!(
                r#"<section class="stats-grid stats-grid--three">{}{}{}</section>"#,
                render_raw(
                    "Status",
                    &status_pill::render(Some(&deployment.status)),
                    &format!("Artifact: {}", shorten_id(&deployment.artifact_id, 12)),
                ),
                render_small(
                    "Criado",
                    &format_timestamp(deployment.created_at.as_ref()),
                    &format!("Iniciado: {}", format_timestamp(deployment.started_at.as_ref())),
                ),
                render_small(
                    "Finalizado",
                    &format_timestamp(deployment.finished_at.as_ref()),
                    &format!("Max paralelo: {}", deployment.max_parallel),
                ),
            )
        })
        .unwrap_or_default();

    let distribution = detail.map(DeploymentDetail::status_distribution).unwrap_or_default();
    let (id_count, tags, types) = match deployment {
        Some(d) => (
            d.target_device_ids.len(),
            join_or_dash(&d.target_device_tags),
            join_or_dash(&d.target_device_types),
        ),
        None => (0, "-".to_string(), "-".to_string()),
    };

    let devices: &[DeploymentDevice] = detail.map(|d| d.devices.as_slice()).unwrap_or(&[]);
    let rows: String = devices
        .iter()
        .map(|entry| {
            format!(
                r#"<tr><td class="mono">{}</td><td><a href="/devices/{}" class="mono">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                escape(&shorten_id(&entry.id, DEFAULT_ID_PREFIX)),
                path_segment(&entry.device_id),
                escape(&shorten_id(&entry.device_id, DEFAULT_ID_PREFIX)),
                status_pill::render(Some(&entry.status)),
                entry.attempts,
                escape(or_dash(&entry.log)),
            )
        })
        .collect();

    let body = format!(
        r#"{}{}{}<section class="panel-grid">{}<article class="panel"><h3>Escopo de Target</h3><ul class="key-list"><li><span>Device IDs</span><strong>{}</strong></li><li><span>Device Tags</span><strong>{}</strong></li><li><span>Device Types</span><strong>{}</strong></li></ul></article></section><article class="panel"><div class="panel__header"><h3>Devices do Deployment</h3><span class="muted">{} registros</span></div><div class="table-wrap"><table><thead><tr><th>DD ID</th><th>Device ID</th><th>Status</th><th>Tentativas</th><th>Log</th></tr></thead><tbody>{}</tbody></table></div></article>"#,
        inline_error(state.error.as_deref()),
        render_all(flashes),
        cards,
        render_bar_list("Distribuicao por Status", &distribution),
        id_count,
        escape(&tags),
        escape(&types),
        devices.len(),
        rows,
    );

    Shell::new("Detalhe do Deployment", NavItem::Deployments)
        .subtitle(id)
        .actions(actions)
        .refresh_every(reload_secs)
        .render(&body)
}
