//! Console pages

use axum::response::{Html, IntoResponse, Response};

use crate::authn::session::SessionStore;
use crate::components::html::escape;
use crate::http::api::ManagementApi;
use crate::http::client::ApiError;
use crate::pages::flash::Flash;
use crate::sync::query_state::Navigation;

pub mod actions;
pub mod audit;
pub mod dashboard;
pub mod deployment_details;
pub mod deployments;
pub mod device_details;
pub mod devices;
pub mod flash;
pub mod login;
pub mod views;

/// What a page handler answers with
#[derive(Debug)]
pub enum PageOutcome {
    Render(String),
    Navigate(Navigation),
    /// The session ended while loading; show the login form
    SignedOut { next: String },
}

impl IntoResponse for PageOutcome {
    fn into_response(self) -> Response {
        match self {
            PageOutcome::Render(html) => Html(html).into_response(),
            PageOutcome::Navigate(navigation) => navigation.into_response(),
            PageOutcome::SignedOut { next } => {
                Html(login::render(&login::LoginForm::for_next(next), None, false)).into_response()
            }
        }
    }
}

/// Collaborators a page needs for one request
pub struct PageContext<'a> {
    pub api: &'a dyn ManagementApi,
    pub session: &'a SessionStore,
    pub page_size: u32,
    pub flashes: Vec<Flash>,
}

/// Message of a failed call, or `fallback` when it has none
pub fn error_message(err: &ApiError, fallback: &str) -> String {
    Some(err.to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Report a load made with `token` that failed: signs out on 401, returns
/// the message to display
pub(crate) async fn handle_load_error(
    session: &SessionStore,
    token: &str,
    err: &ApiError,
    fallback: &str,
) -> String {
    session.sign_out_if_token_rejected(err, token).await;
    error_message(err, fallback)
}

/// Anterior / Proxima footer
pub(crate) fn pagination_footer(
    page: u32,
    total_pages: u32,
    prev_url: &str,
    next_url: &str,
) -> String {
    let total_pages = total_pages.max(1);
    let prev = if page <= 1 {
        r#"<button type="button" disabled>Anterior</button>"#.to_string()
    } else {
        format!(r#"<a class="button-link" href="{}">Anterior</a>"#, escape(prev_url))
    };
    let next = if page >= total_pages {
        r#"<button type="button" disabled>Proxima</button>"#.to_string()
    } else {
        format!(r#"<a class="button-link" href="{}">Proxima</a>"#, escape(next_url))
    };

    format!(
        r#"<footer class="pagination">{}<span>Pagina {} de {}</span>{}</footer>"#,
        prev, page, total_pages, next
    )
}

/// `Recarregar` control posting to a list reload endpoint
pub(crate) fn reload_button(action: &str, return_to: &str) -> String {
    format!(
        r#"<form method="post" action="{}"><input type="hidden" name="return_to" value="{}"><button type="submit">Recarregar</button></form>"#,
        escape(action),
        escape(return_to)
    )
}

/// `<option>` list with `selected` on the current value
pub(crate) fn select_options(current: &str, choices: &[(&str, &str)]) -> String {
    choices
        .iter()
        .map(|(value, label)| {
            let selected = if *value == current { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape(value),
                selected,
                escape(label)
            )
        })
        .collect()
}
