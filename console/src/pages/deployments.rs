//! Deployment list

use openapi_client::{Deployment, DeploymentStatus, Pagination};
use tracing::debug;

use crate::components::html::{escape, inline_error, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::components::status_pill;
use crate::pages::actions::cancel_url;
use crate::pages::flash::{render_all, Flash};
use crate::pages::{handle_load_error, pagination_footer, reload_button, select_options, PageContext, PageOutcome};
use crate::sync::filters::{DeploymentFilters, Filters};
use crate::sync::list_view::ListView;
use crate::utils::{format_timestamp, shorten_id, DEFAULT_ID_PREFIX};

pub const PATH: &str = "/deployments";
pub const LOAD_ERROR: &str = "Falha ao carregar deployments";

pub async fn page(ctx: PageContext<'_>, view: ListView<DeploymentFilters>) -> PageOutcome {
    let Some(token) = ctx.session.token() else {
        return PageOutcome::SignedOut {
            next: view.canonical_url(),
        };
    };

    debug!("Loading deployments: {}", view.canonical_url());
    let params = view.params(ctx.page_size);

    match ctx.api.list_deployments(&token, &params).await {
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
    view: &ListView<DeploymentFilters>,
    items: &[Deployment],
    pagination: &Pagination,
    error: Option<&str>,
    flashes: &[Flash],
) -> String {
    let mut status_choices = vec![("", "Todos")];
    status_choices.extend(DeploymentStatus::FILTERABLE.iter().map(|s| (s.as_str(), s.as_str())));

    let filters = format!(
        r#"<article class="panel"><h3>Filtros</h3><form class="filters filters--two" method="get" action="{PATH}/apply"><label>Status<select name="status">{}</select></label><div class="filters__actions"><button type="submit">Aplicar</button><a class="button-link ghost" href="{}">Limpar</a></div></form></article>"#,
        select_options(&view.draft.status, &status_choices),
        escape(view.clear().url()),
    );

    let return_to = view.canonical_url();
    let rows: String = items
        .iter()
        .map(|deployment| {
            let detail = format!("{}/{}", PATH, path_segment(&deployment.id));
            let cancel = if deployment.can_cancel() {
                format!(
                    r#"<a class="button-link danger" href="{}">Cancelar</a>"#,
                    escape(&cancel_url(&deployment.id, &return_to))
                )
            } else {
                String::new()
            };
            format!(
                r#"<tr><td class="mono">{}</td><td><a href="{detail}">{}</a></td><td>{}</td><td class="mono">{}</td><td>{}</td><td><div class="row-actions"><a class="button-link" href="{detail}">Detalhes</a>{cancel}</div></td></tr>"#,
                escape(&shorten_id(&deployment.id, DEFAULT_ID_PREFIX)),
                escape(&deployment.name),
                status_pill::render(Some(&deployment.status)),
                escape(&shorten_id(&deployment.artifact_id, 10)),
                format_timestamp(deployment.created_at.as_ref()),
            )
        })
        .collect();

    let table = format!(
        r#"<article class="panel"><div class="panel__header"><h3>Lista de Deployments</h3><span class="muted">{} registros</span></div><div class="table-wrap"><table><thead><tr><th>ID</th><th>Nome</th><th>Status</th><th>Artifact</th><th>Criado em</th><th>Acoes</th></tr></thead><tbody>{}</tbody></table></div>{}</article>"#,
        pagination.total,
        rows,
        pagination_footer(
            view.page,
            pagination.page_count(),
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

    Shell::new("Deployments", NavItem::Deployments)
        .subtitle(view.filters.summary())
        .actions(reload_button(&format!("{}/reload", PATH), &view.canonical_url()))
        .render(&body)
}
