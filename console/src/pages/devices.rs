//! Device list

use openapi_client::{Device, DeviceStatus, Pagination};
use tracing::debug;

use crate::components::html::{escape, inline_error, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::components::status_pill;
use crate::pages::flash::{render_all, Flash};
use crate::pages::{handle_load_error, pagination_footer, reload_button, select_options, PageContext, PageOutcome};
use crate::sync::filters::{DeviceFilters, Filters};
use crate::sync::list_view::ListView;
use crate::utils::{format_timestamp, join_or_dash, or_dash, shorten_id, DEFAULT_ID_PREFIX};

pub const PATH: &str = "/devices";
pub const LOAD_ERROR: &str = "Falha ao carregar devices";

pub async fn page(ctx: PageContext<'_>, view: ListView<DeviceFilters>) -> PageOutcome {
    let Some(token) = ctx.session.token() else {
        return PageOutcome::SignedOut {
            next: view.canonical_url(),
        };
    };

    debug!("Loading devices: {}", view.canonical_url());
    let params = view.params(ctx.page_size);

    match ctx.api.list_devices(&token, &params).await {
        Ok(response) => {
            if let Some(navigation) = view.reconcile(response.pagination.total_pages) {
                return PageOutcome::Navigate(navigation);
            }
            PageOutcome::Render(render(&view, &response.data, &response.pagination, None, &ctx.flashes))
        }
        Err(e) => {
            let message = handle_load_error(ctx.session, &token, &e, LOAD_ERROR).await;
            if !ctx.session.is_authenticated() {
                return PageOutcome::SignedOut {
                    next: view.canonical_url(),
                };
            }
            PageOutcome::Render(render(
                &view,
                &[],
                &Pagination::default(),
                Some(&message),
                &ctx.flashes,
            ))
        }
    }
}

pub fn render(
    view: &ListView<DeviceFilters>,
    items: &[Device],
    pagination: &Pagination,
    error: Option<&str>,
    flashes: &[Flash],
) -> String {
    let draft = &view.draft;

    let mut status_choices = vec![("", "Todos")];
    status_choices.extend(DeviceStatus::FILTERABLE.iter().map(|s| (s.as_str(), s.as_str())));

    let filters = format!(
        r#"<article class="panel"><h3>Filtros</h3><form class="filters" method="get" action="{PATH}/apply"><label>Status<select name="status">{}</select></label><label>Device Type<input name="device_type" value="{}" placeholder="raspberry-pi-4"></label><label>Tags (CSV)<input name="tag" value="{}" placeholder="production, rack-01"></label><div class="filters__actions"><button type="submit">Aplicar</button><a class="button-link ghost" href="{}">Limpar</a></div></form></article>"#,
        select_options(&draft.status, &status_choices),
        escape(&draft.device_type),
        escape(&draft.tag),
        escape(view.clear().url()),
    );

    let rows: String = items
        .iter()
        .map(|device| {
            format!(
                r#"<tr><td><a href="{PATH}/{}" class="mono">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>"#,
                path_segment(&device.id),
                escape(&shorten_id(&device.id, DEFAULT_ID_PREFIX)),
                escape(or_dash(&device.device_type)),
                status_pill::render(Some(&device.status)),
                escape(&join_or_dash(&device.tags)),
                format_timestamp(device.last_check_in.as_ref()),
            )
        })
        .collect();

    let page_count = pagination.page_count();
    let table = format!(
        r#"<article class="panel"><div class="panel__header"><h3>Lista de Devices</h3><span class="muted">{} registros</span></div><div class="table-wrap"><table><thead><tr><th>ID</th><th>Tipo</th><th>Status</th><th>Tags</th><th>Ultimo Check-in</th></tr></thead><tbody>{}</tbody></table></div>{}</article>"#,
        pagination.total,
        rows,
        pagination_footer(
            view.page,
            page_count,
            &view.page_url(view.page.saturating_sub(1).max(1)),
            &view.page_url(view.page.saturating_add(1)),
        ),
    );

    let body = format!(
        "{}{}{}{}",
        filters,
        inline_error(error),
        render_all(flashes),
        table
    );

    Shell::new("Devices", NavItem::Devices)
        .subtitle(view.filters.summary())
        .actions(reload_button(&format!("{}/reload", PATH), &view.canonical_url()))
        .render(&body)
}
