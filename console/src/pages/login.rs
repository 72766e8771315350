//! Sign-in form

use serde::Deserialize;

use crate::components::html::{disabled, escape, inline_error};
use crate::components::layout::document;

/// Submitted sign-in form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Where to go after signing in
    #[serde(default)]
    pub next: String,
}

impl LoginForm {
    pub fn for_next(next: impl Into<String>) -> Self {
        Self {
            next: next.into(),
            ..Default::default()
        }
    }

    /// Local path to continue to, `/` for anything else
    pub fn next_path(&self) -> String {
        safe_local_path(&self.next)
    }
}

/// Accept only same-origin absolute paths
pub fn safe_local_path(candidate: &str) -> String {
    let is_local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\")
        && !candidate.starts_with("/login");
    if is_local {
        candidate.to_string()
    } else {
        "/".to_string()
    }
}

pub fn render(form: &LoginForm, error: Option<&str>, loading: bool) -> String {
    let email = if form.email.is_empty() {
        "admin@harbor.local"
    } else {
        form.email.as_str()
    };
    let button = if loading { "Entrando..." } else { "Entrar" };

    let body = format!(
        r#"<main class="login-screen"><section class="login-card"><p class="eyebrow">Harbor Console</p><h1>Dashboard de Operacao</h1><p class="subtitle">Gerencie devices, deployments e auditoria com visao consolidada.</p><form class="login-form" method="post" action="/login"><input type="hidden" name="next" value="{next}"><label>Email<input type="email" name="email" value="{email}" placeholder="admin@harbor.local" required></label><label>Senha<input type="password" name="password" placeholder="admin" required></label><button type="submit"{disabled}>{button}</button>{error}</form></section></main>"#,
        next = escape(&form.next_path()),
        email = escape(email),
        disabled = disabled(loading),
        error = inline_error(error).replace(" form-error--inline", ""),
    );

    document("Entrar", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_path_is_local_only() {
        assert_eq!(safe_local_path("/deployments?status=active"), "/deployments?status=active");
        assert_eq!(safe_local_path("https://evil.example"), "/");
        assert_eq!(safe_local_path("//evil.example"), "/");
        assert_eq!(safe_local_path("/login"), "/");
        assert_eq!(safe_local_path(""), "/");
    }

    #[test]
    fn test_render_shows_error() {
        let html = render(&LoginForm::default(), Some("Falha de autenticacao"), false);
        assert!(html.contains(r#"<p class="form-error">Falha de autenticacao</p>"#));
        assert!(html.contains(r#"action="/login""#));
        assert!(!html.contains("Entrando..."));
    }
}
