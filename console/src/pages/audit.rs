//! Audit log

use openapi_client::{AuditEntry, Pagination};
use tracing::debug;

use crate::components::html::{escape, inline_error};
use crate::components::layout::{NavItem, Shell};
use crate::pages::{handle_load_error, pagination_footer, reload_button, PageContext, PageOutcome};
use crate::sync::filters::{AuditFilters, Filters};
use crate::sync::list_view::ListView;
use crate::utils::{format_timestamp, shorten_id};

pub const PATH: &str = "/audit";
pub const LOAD_ERROR: &str = "Falha ao carregar auditoria";

pub async fn page(ctx: PageContext<'_>, view: ListView<AuditFilters>) -> PageOutcome {
    let Some(token) = ctx.session.token() else {
        return PageOutcome::SignedOut {
            next: view.canonical_url(),
        };
    };

    debug!("Loading audit log: {}", view.canonical_url());

    match ctx.api.list_audit(&token, &view.params(ctx.page_size)).await {
        Ok(response) => match view.reconcile(response.pagination.total_pages) {
            Some(navigation) => PageOutcome::Navigate(navigation),
            None => PageOutcome::Render(render(&view, &response.data, &response.pagination, None)),
        },
        Err(e) => {
            let message = handle_load_error(ctx.session, &token, &e, LOAD_ERROR).await;
            if !ctx.session.is_authenticated() {
                return PageOutcome::SignedOut {
                    next: view.canonical_url(),
                };
            }
            PageOutcome::Render(render(&view, &[], &Pagination::default(), Some(&message)))
        }
    }
}

pub fn render(
    view: &ListView<AuditFilters>,
    items: &[AuditEntry],
    pagination: &Pagination,
    error: Option<&str>,
) -> String {
    let draft = &view.draft;
    let filters = format!(
        r#"<article class="panel"><h3>Filtros</h3><form class="filters" method="get" action="{PATH}/apply"><label>Actor<input name="actor" value="{}" placeholder="admin"></label><label>Action<input name="action" value="{}" placeholder="deployment.create"></label><label>Resource<input name="resource" value="{}" placeholder="deployment"></label><div class="filters__actions"><button type="submit">Aplicar</button><a class="button-link ghost" href="{}">Limpar</a></div></form></article>"#,
        escape(&draft.actor),
        escape(&draft.action),
        escape(&draft.resource),
        escape(view.clear().url()),
    );

    let rows: String = items
        .iter()
        .map(|entry| {
            format!(
                r#"<tr><td>{}</td><td>{}</td><td>{}</td><td class="mono">{}</td><td>{}</td></tr>"#,
                escape(&entry.actor),
                escape(&entry.action),
                escape(&entry.resource),
                escape(&shorten_id(&entry.resource_id, 12)),
                format_timestamp(entry.created_at.as_ref()),
            )
        })
        .collect();

    let table = format!(
        r#"<article class="panel"><div class="panel__header"><h3>Eventos</h3><span class="muted">{} registros</span></div><div class="table-wrap"><table><thead><tr><th>Actor</th><th>Action</th><th>Resource</th><th>Resource ID</th><th>Data</th></tr></thead><tbody>{}</tbody></table></div>{}</article>"#,
        pagination.total,
        rows,
        pagination_footer(
            view.page,
            pagination.page_count(),
            &view.page_url(view.page.saturating_sub(1).max(1)),
            &view.page_url(view.page.saturating_add(1)),
        ),
    );

    Shell::new("Audit Log", NavItem::Audit)
        .subtitle(view.filters.summary())
        .actions(reload_button(&format!("{}/reload", PATH), &view.canonical_url()))
        .render(&format!("{}{}{}", filters, inline_error(error), table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_entries() {
        let view = ListView::<AuditFilters>::from_query(PATH, Some("actor=admin&page=2"));
        let entry: AuditEntry = serde_json::from_value(serde_json::json!({
            "id": "a1",
            "actor": "admin",
            "action": "deployment.cancel",
            "resource": "deployment",
            "resource_id": "0b6f8a52-1d7e-4c1a",
            "created_at": "2025-03-01T08:05:09Z",
        }))
        .unwrap();
        let pagination = Pagination {
            page: 2,
            per_page: 20,
            total: 21,
            total_pages: 2,
        };
        let html = render(&view, &[entry], &pagination, None);

        assert!(html.contains("actor=admin"));
        assert!(html.contains("0b6f8a52-1d7..."));
        assert!(html.contains("2025-03-01 08:05:09 UTC"));
        assert!(html.contains("Pagina 2 de 2"));
        assert!(html.contains(r#"href="/audit?actor=admin">Anterior"#));
    }

    #[test]
    fn test_last_representable_page_renders_on_error() {
        let view = ListView::<AuditFilters>::from_query(PATH, Some("page=4294967295"));
        let html = render(&view, &[], &Pagination::default(), Some(LOAD_ERROR));
        assert!(html.contains("Pagina 4294967295 de 1"));
    }
}
