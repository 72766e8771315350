//! Confirmed mutations: deployment cancellation and device status updates

use openapi_client::DeviceStatus;
use serde::Deserialize;
use tracing::info;
use url::form_urlencoded;

use crate::authn::session::SessionStore;
use crate::components::html::{escape, path_segment};
use crate::components::layout::{NavItem, Shell};
use crate::http::api::ManagementApi;
use crate::pages::error_message;
use crate::pages::login::safe_local_path;
use crate::utils::{shorten_id, DEFAULT_ID_PREFIX};

pub const CANCEL_PROMPT: &str = "Cancelar este deployment?";
pub const CANCEL_ERROR: &str = "Falha ao cancelar deployment";
pub const STATUS_ERROR: &str = "Falha ao atualizar status";

/// A mutation awaiting the operator's confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    CancelDeployment { id: String },
    UpdateDeviceStatus { id: String, status: DeviceStatus },
}

/// Proof that the operator confirmed an action; only [`ConsoleAction::confirm`]
/// builds one
#[derive(Debug)]
pub struct Confirmed(ConsoleAction);

/// Answer posted from the confirmation page
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmForm {
    #[serde(default)]
    pub confirm: String,
    #[serde(default)]
    pub return_to: String,
    #[serde(default)]
    pub status: String,
}

/// Result of a confirmed action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionState {
    Succeeded(String),
    Failed(String),
    /// The backend rejected the session
    SignedOut,
}

impl ConsoleAction {
    pub fn prompt(&self) -> String {
        match self {
            ConsoleAction::CancelDeployment { .. } => CANCEL_PROMPT.to_string(),
            ConsoleAction::UpdateDeviceStatus { status, .. } => {
                format!("Alterar o status deste device para {}?", status)
            }
        }
    }

    /// Detail page of the target resource
    pub fn detail_path(&self) -> String {
        match self {
            ConsoleAction::CancelDeployment { id } => format!("/deployments/{}", path_segment(id)),
            ConsoleAction::UpdateDeviceStatus { id, .. } => format!("/devices/{}", path_segment(id)),
        }
    }

    /// Where the confirmation form posts
    pub fn submit_path(&self) -> String {
        match self {
            ConsoleAction::CancelDeployment { .. } => format!("{}/cancel", self.detail_path()),
            ConsoleAction::UpdateDeviceStatus { .. } => format!("{}/status", self.detail_path()),
        }
    }

    pub fn confirm(self, form: &ConfirmForm) -> Option<Confirmed> {
        if form.confirm == "yes" {
            Some(Confirmed(self))
        } else {
            None
        }
    }

    /// Page to come back to: a safe `return_to`, else the detail page
    pub fn return_path(&self, return_to: &str) -> String {
        if return_to.is_empty() {
            return self.detail_path();
        }
        match safe_local_path(return_to).as_str() {
            "/" => self.detail_path(),
            other => other.to_string(),
        }
    }

    fn success_message(&self, return_path: &str) -> String {
        match self {
            ConsoleAction::CancelDeployment { id } => {
                if return_path.starts_with(&self.detail_path()) {
                    "Deployment cancelado com sucesso.".to_string()
                } else {
                    format!(
                        "Deployment {} cancelado com sucesso.",
                        shorten_id(id, DEFAULT_ID_PREFIX)
                    )
                }
            }
            ConsoleAction::UpdateDeviceStatus { status, .. } => {
                format!("Status atualizado para {}.", status)
            }
        }
    }
}

impl Confirmed {
    pub fn action(&self) -> &ConsoleAction {
        &self.0
    }

    /// Perform the mutation; a 401 ends the session
    pub async fn perform(
        self,
        api: &dyn ManagementApi,
        session: &SessionStore,
        return_path: &str,
    ) -> ActionState {
        let Some(token) = session.token() else {
            return ActionState::SignedOut;
        };

        let (result, fallback) = match &self.0 {
            ConsoleAction::CancelDeployment { id } => {
                (api.cancel_deployment(&token, id).await, CANCEL_ERROR)
            }
            ConsoleAction::UpdateDeviceStatus { id, status } => {
                (api.update_device_status(&token, id, *status).await, STATUS_ERROR)
            }
        };

        match result {
            Ok(()) => {
                info!("Action completed: {:?}", self.0);
                ActionState::Succeeded(self.0.success_message(return_path))
            }
            Err(e) => {
                if session.sign_out_if_token_rejected(&e, &token).await {
                    return ActionState::SignedOut;
                }
                ActionState::Failed(error_message(&e, fallback))
            }
        }
    }
}

/// Link to the cancellation prompt of a deployment
pub fn cancel_url(id: &str, return_to: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("return_to", return_to)
        .finish();
    format!("/deployments/{}/cancel?{}", path_segment(id), query)
}

/// Link to the status update prompt of a device
pub fn status_url(id: &str, status: DeviceStatus) -> String {
    format!("/devices/{}/status/{}", path_segment(id), status.as_str())
}

/// Confirmation page of an action
pub fn render_confirm(action: &ConsoleAction, return_to: &str) -> String {
    let back = action.return_path(return_to);
    let (title, nav, subtitle) = match action {
        ConsoleAction::CancelDeployment { id } => ("Cancelar Deployment", NavItem::Deployments, id),
        ConsoleAction::UpdateDeviceStatus { id, .. } => ("Atualizar Status", NavItem::Devices, id),
    };
    let status_field = match action {
        ConsoleAction::UpdateDeviceStatus { status, .. } => format!(
            r#"<input type="hidden" name="status" value="{}">"#,
            status.as_str()
        ),
        ConsoleAction::CancelDeployment { .. } => String::new(),
    };

    let body = format!(
        r#"<article class="panel confirm-card"><p>{}</p><form method="post" action="{}"><input type="hidden" name="confirm" value="yes"><input type="hidden" name="return_to" value="{}">{}<div class="row-actions"><button type="submit" class="danger">Confirmar</button><a class="button-link ghost" href="{}">Voltar</a></div></form></article>"#,
        escape(&action.prompt()),
        escape(&action.submit_path()),
        escape(&back),
        status_field,
        escape(&back),
    );

    Shell::new(title, nav).subtitle(subtitle.clone()).render(&body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_required() {
        let action = ConsoleAction::CancelDeployment {
            id: "dep-1".to_string(),
        };
        assert!(action.clone().confirm(&ConfirmForm::default()).is_none());

        let form = ConfirmForm {
            confirm: "yes".to_string(),
            ..Default::default()
        };
        let confirmed = action.clone().confirm(&form).unwrap();
        assert_eq!(confirmed.action(), &action);
    }

    #[test]
    fn test_return_path_is_local() {
        let action = ConsoleAction::CancelDeployment {
            id: "dep-1".to_string(),
        };
        assert_eq!(action.return_path(""), "/deployments/dep-1");
        assert_eq!(action.return_path("https://evil.example"), "/deployments/dep-1");
        assert_eq!(
            action.return_path("/deployments?status=active"),
            "/deployments?status=active"
        );
    }

    #[test]
    fn test_success_messages() {
        let action = ConsoleAction::CancelDeployment {
            id: "0123456789abcdef".to_string(),
        };
        assert_eq!(
            action.success_message("/deployments?page=2"),
            "Deployment 01234567... cancelado com sucesso."
        );
        assert_eq!(
            action.success_message("/deployments/0123456789abcdef"),
            "Deployment cancelado com sucesso."
        );

        let action = ConsoleAction::UpdateDeviceStatus {
            id: "d1".to_string(),
            status: DeviceStatus::Accepted,
        };
        assert_eq!(action.success_message("/devices/d1"), "Status atualizado para accepted.");
    }

    #[test]
    fn test_confirm_page() {
        let action = ConsoleAction::CancelDeployment {
            id: "dep-1".to_string(),
        };
        let html = render_confirm(&action, "/deployments?status=active");
        assert!(html.contains(CANCEL_PROMPT));
        assert!(html.contains(r#"action="/deployments/dep-1/cancel""#));
        assert!(html.contains(r#"name="return_to" value="/deployments?status=active""#));

        assert_eq!(
            cancel_url("dep-1", "/deployments?status=active"),
            "/deployments/dep-1/cancel?return_to=%2Fdeployments%3Fstatus%3Dactive"
        );
        assert_eq!(
            status_url("d1", DeviceStatus::Rejected),
            "/devices/d1/status/rejected"
        );
    }
}
