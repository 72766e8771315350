//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, RawQuery, Request, State},
    http::{header, Method},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use openapi_client::DeviceStatus;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::authn::session::SIGN_IN_FALLBACK_ERROR;
use crate::components::layout::STYLESHEET;
use crate::http::auth::Credentials;
use crate::pages::actions::{render_confirm, ActionState, ConfirmForm, ConsoleAction};
use crate::pages::dashboard::{self, DashboardView};
use crate::pages::deployment_details::{self, DeploymentDetailView};
use crate::pages::flash::Flash;
use crate::pages::login::{self, safe_local_path, LoginForm};
use crate::pages::{audit, deployments, device_details, devices, PageOutcome};
use crate::server::state::ServerState;
use crate::sync::filters::{AuditFilters, DeploymentFilters, DeviceFilters, Filters};
use crate::sync::list_view::ListView;
use crate::sync::query_state::{Navigation, QueryMap};
use crate::utils::version_info;

// ================================= AMBIENT ====================================== //

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "harbor-console".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

pub async fn stylesheet_handler() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// Unknown routes land on the dashboard
pub async fn fallback_handler() -> Navigation {
    Navigation::Replace("/".to_string())
}

// ================================= SESSION ====================================== //

fn login_url(next: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next)
        .finish();
    format!("/login?{}", query)
}

/// Gate for every console page: without a session, pages show the login form
pub async fn require_session(State(state): State<Arc<ServerState>>, request: Request, next: Next) -> Response {
    if state.session.is_authenticated() {
        return next.run(request).await;
    }

    let target = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string());
    debug!("No operator session for {}", target);

    if request.method() == Method::GET {
        Html(login::render(&LoginForm::for_next(target), None, false)).into_response()
    } else {
        Redirect::to("/login").into_response()
    }
}

pub async fn login_page_handler(State(state): State<Arc<ServerState>>, Query(form): Query<LoginForm>) -> Response {
    if state.session.is_authenticated() {
        return Redirect::to(&form.next_path()).into_response();
    }
    Html(login::render(&LoginForm::for_next(form.next), None, false)).into_response()
}

pub async fn login_handler(State(state): State<Arc<ServerState>>, Form(form): Form<LoginForm>) -> Response {
    let credentials = Credentials::new(form.email.clone(), form.password.clone());

    match state.session.sign_in(&credentials).await {
        Ok(()) => Redirect::to(&form.next_path()).into_response(),
        Err(_) => {
            let error = state
                .session
                .snapshot()
                .error
                .unwrap_or_else(|| SIGN_IN_FALLBACK_ERROR.to_string());
            let form = LoginForm {
                password: String::new(),
                ..form
            };
            Html(login::render(&form, Some(&error), false)).into_response()
        }
    }
}

pub async fn logout_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    state.session.sign_out().await;
    Redirect::to("/login")
}

// ================================= LIVE VIEWS =================================== //

/// Interval picked in an auto-refresh selector
#[derive(Debug, Deserialize)]
pub struct RefreshForm {
    pub interval_ms: u64,
}

fn open_dashboard(state: &ServerState) -> (Arc<DashboardView>, bool) {
    state.views.dashboard(|| {
        dashboard::open(
            state.api.clone(),
            state.session.clone(),
            state.view_options.dashboard_refresh_ms,
        )
    })
}

fn open_deployment(state: &ServerState, id: &str) -> (Arc<DeploymentDetailView>, bool) {
    state.views.deployment(id, || {
        deployment_details::open(
            state.api.clone(),
            state.session.clone(),
            id,
            state.view_options.deployment_refresh_ms,
        )
    })
}

pub async fn dashboard_handler(State(state): State<Arc<ServerState>>) -> PageOutcome {
    let (view, opened) = open_dashboard(&state);
    if opened {
        view.load(false).await;
    }

    if !state.session.is_authenticated() {
        return PageOutcome::SignedOut {
            next: "/".to_string(),
        };
    }

    PageOutcome::Render(dashboard::render(
        &view.state(),
        view.refresh_ms(),
        view.reload_secs(),
    ))
}

pub async fn dashboard_reload_handler(State(state): State<Arc<ServerState>>) -> Redirect {
    let (view, _) = open_dashboard(&state);
    view.load(false).await;
    Redirect::to("/")
}

pub async fn dashboard_refresh_handler(
    State(state): State<Arc<ServerState>>,
    Form(form): Form<RefreshForm>,
) -> Redirect {
    let (view, _) = open_dashboard(&state);
    if view.set_refresh_ms(form.interval_ms) {
        debug!("Dashboard auto-refresh set to {} ms", form.interval_ms);
    }
    Redirect::to("/")
}

pub async fn deployment_handler(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> PageOutcome {
    let path = deployment_details::path(&id);
    let (view, opened) = open_deployment(&state, &id);
    if opened {
        view.load(false).await;
    }

    if !state.session.is_authenticated() {
        return PageOutcome::SignedOut { next: path };
    }

    let flashes = state.flashes.take(&path);
    PageOutcome::Render(deployment_details::render(
        &id,
        &view.state(),
        view.refresh_ms(),
        view.reload_secs(),
        &flashes,
    ))
}

pub async fn deployment_reload_handler(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> Redirect {
    let (view, _) = open_deployment(&state, &id);
    view.load(false).await;
    Redirect::to(&deployment_details::path(&id))
}

pub async fn deployment_refresh_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Form(form): Form<RefreshForm>,
) -> Redirect {
    let (view, _) = open_deployment(&state, &id);
    if view.set_refresh_ms(form.interval_ms) {
        debug!("Deployment {} auto-refresh set to {} ms", id, form.interval_ms);
    }
    Redirect::to(&deployment_details::path(&id))
}

// ================================= LISTS ======================================== //

/// Page to come back to after a list reload
#[derive(Debug, Default, Deserialize)]
pub struct ReturnForm {
    #[serde(default)]
    pub return_to: String,
}

/// Turn the submitted filter form into the list URL
fn apply<F: Filters>(path: &str, raw: Option<String>) -> Navigation {
    let draft = F::from_query(&QueryMap::parse(raw.as_deref()));
    ListView::<F>::from_query(path, None).submit(&draft)
}

/// Refetch a list with its filters unchanged; every list GET loads afresh
fn reload_list(path: &str, return_to: &str) -> Redirect {
    debug!("Reloading {}", path);

    let target = if return_to.starts_with(path) {
        safe_local_path(return_to)
    } else {
        path.to_string()
    };
    Redirect::to(&target)
}

pub async fn devices_handler(State(state): State<Arc<ServerState>>, RawQuery(raw): RawQuery) -> PageOutcome {
    state.views.close();
    let view = ListView::<DeviceFilters>::from_query(devices::PATH, raw.as_deref());
    devices::page(state.page_context(devices::PATH), view).await
}

pub async fn devices_apply_handler(RawQuery(raw): RawQuery) -> Navigation {
    apply::<DeviceFilters>(devices::PATH, raw)
}

pub async fn devices_reload_handler(Form(form): Form<ReturnForm>) -> Redirect {
    reload_list(devices::PATH, &form.return_to)
}

pub async fn deployments_handler(State(state): State<Arc<ServerState>>, RawQuery(raw): RawQuery) -> PageOutcome {
    state.views.close();
    let view = ListView::<DeploymentFilters>::from_query(deployments::PATH, raw.as_deref());
    deployments::page(state.page_context(deployments::PATH), view).await
}

pub async fn deployments_apply_handler(RawQuery(raw): RawQuery) -> Navigation {
    apply::<DeploymentFilters>(deployments::PATH, raw)
}

pub async fn deployments_reload_handler(Form(form): Form<ReturnForm>) -> Redirect {
    reload_list(deployments::PATH, &form.return_to)
}

pub async fn audit_handler(State(state): State<Arc<ServerState>>, RawQuery(raw): RawQuery) -> PageOutcome {
    state.views.close();
    let view = ListView::<AuditFilters>::from_query(audit::PATH, raw.as_deref());
    audit::page(state.page_context(audit::PATH), view).await
}

pub async fn audit_apply_handler(RawQuery(raw): RawQuery) -> Navigation {
    apply::<AuditFilters>(audit::PATH, raw)
}

pub async fn audit_reload_handler(Form(form): Form<ReturnForm>) -> Redirect {
    reload_list(audit::PATH, &form.return_to)
}

// ================================= DETAILS & ACTIONS ============================ //

pub async fn device_handler(State(state): State<Arc<ServerState>>, Path(id): Path<String>) -> PageOutcome {
    state.views.close();
    let path = device_details::path(&id);
    device_details::page(state.page_context(&path), &id, &path).await
}

pub async fn device_status_confirm_handler(
    State(state): State<Arc<ServerState>>,
    Path((id, status)): Path<(String, String)>,
    Query(form): Query<ReturnForm>,
) -> Response {
    state.views.close();
    match DeviceStatus::parse(&status) {
        Some(status) => {
            let action = ConsoleAction::UpdateDeviceStatus { id, status };
            Html(render_confirm(&action, &form.return_to)).into_response()
        }
        None => {
            warn!("Rejected unknown device status {:?}", status);
            Redirect::to(&device_details::path(&id)).into_response()
        }
    }
}

pub async fn device_status_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    match DeviceStatus::parse(&form.status) {
        Some(status) => {
            perform_action(&state, ConsoleAction::UpdateDeviceStatus { id, status }, &form).await
        }
        None => {
            warn!("Rejected unknown device status {:?}", form.status);
            Redirect::to(&device_details::path(&id)).into_response()
        }
    }
}

pub async fn deployment_cancel_confirm_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Query(form): Query<ReturnForm>,
) -> Html<String> {
    state.views.close();
    Html(render_confirm(
        &ConsoleAction::CancelDeployment { id },
        &form.return_to,
    ))
}

pub async fn deployment_cancel_handler(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Form(form): Form<ConfirmForm>,
) -> Response {
    perform_action(&state, ConsoleAction::CancelDeployment { id }, &form).await
}

/// Run a confirmed action and leave its feedback on the page we return to
async fn perform_action(state: &ServerState, action: ConsoleAction, form: &ConfirmForm) -> Response {
    let return_path = action.return_path(&form.return_to);
    let Some(confirmed) = action.confirm(form) else {
        return Redirect::to(&return_path).into_response();
    };

    let flash_key = return_path
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(&return_path)
        .to_string();

    match confirmed
        .perform(state.api.as_ref(), &state.session, &return_path)
        .await
    {
        ActionState::Succeeded(message) => state.flashes.post(&flash_key, Flash::success(message)),
        ActionState::Failed(message) => state.flashes.post(&flash_key, Flash::error(message)),
        ActionState::SignedOut => return Redirect::to(&login_url(&return_path)).into_response(),
    }

    Redirect::to(&return_path).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(
            login_url("/deployments?status=active"),
            "/login?next=%2Fdeployments%3Fstatus%3Dactive"
        );
    }

    #[test]
    fn test_apply_resets_page() {
        let navigation = apply::<DeviceFilters>(
            devices::PATH,
            Some("status=pending&device_type=&tag=rack-01".to_string()),
        );
        assert_eq!(
            navigation,
            Navigation::Push("/devices?status=pending&tag=rack-01".to_string())
        );
    }
}
