//! Device detail with admission controls

use openapi_client::{Device, DeviceStatus};
use tracing::debug;

use crate::components::html::{escape, inline_error, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::components::stat_card::{render_raw, render_small};
use crate::components::status_pill;
use crate::pages::actions::status_url;
use crate::pages::flash::{render_all, Flash};
use crate::pages::{handle_load_error, PageContext, PageOutcome};
use crate::utils::{format_timestamp, join_or_dash, or_dash};

pub const LOAD_ERROR: &str = "Falha ao carregar device";

pub fn path(id: &str) -> String {
    format!("/devices/{}", path_segment(id))
}

pub async fn page(ctx: PageContext<'_>, id: &str, path: &str) -> PageOutcome {
    let Some(token) = ctx.session.token() else {
        return PageOutcome::SignedOut {
            next: path.to_string(),
        };
    };

    debug!("Loading device {}", id);

    match ctx.api.get_device(&token, id).await {
        Ok(device) => PageOutcome::Render(render(id, Some(&device), None, &ctx.flashes)),
        Err(e) => {
            let message = handle_load_error(ctx.session, &token, &e, LOAD_ERROR).await;
            if !ctx.session.is_authenticated() {
                return PageOutcome::SignedOut {
                    next: path.to_string(),
                };
            }
            PageOutcome::Render(render(id, None, Some(&message), &ctx.flashes))
        }
    }
}

fn status_button(id: &str, device: Option<&Device>, target: DeviceStatus, label: &str, class: &str) -> String {
    match device {
        Some(device) if device.known_status() != target => format!(
            r#"<a class="button-link {}" href="{}">{}</a>"#,
            class,
            escape(&status_url(id, target)),
            label
        ),
        _ => format!(r#"<button type="button" class="{}" disabled>{}</button>"#, class, label),
    }
}

fn json_block(value: &serde_json::Map<String, serde_json::Value>) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    format!(r#"<pre class="json-block">{}</pre>"#, escape(&pretty))
}

pub fn render(id: &str, device: Option<&Device>, error: Option<&str>, flashes: &[Flash]) -> String {
    let actions = format!(
        r#"<div class="row-actions row-actions--header"><a href="/devices" class="button-link">Voltar para lista</a>{}{}</div>"#,
        status_button(id, device, DeviceStatus::Accepted, "Aceitar", ""),
        status_button(id, device, DeviceStatus::Rejected, "Rejeitar", "danger"),
    );

    let details = device
        .map(|device| {
            format!(
                r#"<section class="stats-grid stats-grid--three">{}{}{}</section><section class="panel-grid"><article class="panel"><h3>Identity Data</h3>{}</article><article class="panel"><h3>Inventory</h3>{}</article></section>"#,
                render_raw(
                    "Status",
                    &status_pill::render(Some(&device.status)),
                    &format!("Tipo: {}", or_dash(&device.device_type)),
                ),
                render_small(
                    "Criado em",
                    &format_timestamp(device.created_at.as_ref()),
                    &format!("Atualizado: {}", format_timestamp(device.updated_at.as_ref())),
                ),
                render_small(
                    "Ultimo Check-in",
                    &format_timestamp(device.last_check_in.as_ref()),
                    &format!("Tags: {}", join_or_dash(&device.tags)),
                ),
                json_block(&device.identity_data),
                json_block(&device.inventory),
            )
        })
        .unwrap_or_default();

    let body = format!("{}{}{}", inline_error(error), render_all(flashes), details);

    Shell::new("Detalhe do Device", NavItem::Devices)
        .subtitle(id)
        .actions(actions)
        .render(&body)
}
