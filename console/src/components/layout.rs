//! Page shell with the navigation sidebar

use crate::components::html::escape;

pub const STYLESHEET_PATH: &str = "/static/console.css";

/// Sidebar entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Devices,
    Deployments,
    Audit,
}

impl NavItem {
    pub const ALL: [NavItem; 4] = [
        NavItem::Dashboard,
        NavItem::Devices,
        NavItem::Deployments,
        NavItem::Audit,
    ];

    pub fn href(&self) -> &'static str {
        match self {
            NavItem::Dashboard => "/",
            NavItem::Devices => "/devices",
            NavItem::Deployments => "/deployments",
            NavItem::Audit => "/audit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            NavItem::Dashboard => "Dashboard",
            NavItem::Devices => "Devices",
            NavItem::Deployments => "Deployments",
            NavItem::Audit => "Audit",
        }
    }
}

/// A page rendered inside the application shell
#[derive(Debug, Clone, Default)]
pub struct Shell {
    pub title: String,
    pub subtitle: Option<String>,
    /// Pre-rendered header controls
    pub actions: String,
    pub active: Option<NavItem>,
    /// Ask the browser to reload the page every this many seconds
    pub refresh_secs: Option<u64>,
}

impl Shell {
    pub fn new(title: &str, active: NavItem) -> Self {
        Self {
            title: title.to_string(),
            active: Some(active),
            ..Default::default()
        }
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn actions(mut self, actions: impl Into<String>) -> Self {
        self.actions = actions.into();
        self
    }

    pub fn refresh_every(mut self, secs: Option<u64>) -> Self {
        self.refresh_secs = secs.filter(|s| *s > 0);
        self
    }

    pub fn render(&self, body: &str) -> String {
        let nav: String = NavItem::ALL
            .iter()
            .map(|item| {
                let class = if Some(*item) == self.active {
                    "sidebar__link sidebar__link--active"
                } else {
                    "sidebar__link"
                };
                format!(r#"<a href="{}" class="{}">{}</a>"#, item.href(), class, item.label())
            })
            .collect();

        let subtitle = self
            .subtitle
            .as_deref()
            .map(|s| format!(r#"<p class="subtitle">{}</p>"#, escape(s)))
            .unwrap_or_default();

        let actions = if self.actions.is_empty() {
            String::new()
        } else {
            format!(r#"<div class="content__actions">{}</div>"#, self.actions)
        };

        let inner = format!(
            r#"<div class="layout"><aside class="sidebar"><div><p class="eyebrow">Harbor Console</p><h1 class="sidebar__title">Control Center</h1></div><nav class="sidebar__nav">{nav}</nav><form method="post" action="/logout"><button type="submit" class="ghost sidebar__logout">Sair</button></form></aside><main class="content"><header class="content__header"><div><p class="eyebrow">Operacao</p><h2 class="content__title">{title}</h2>{subtitle}</div>{actions}</header>{body}</main></div>"#,
            title = escape(&self.title),
        );

        document(&self.title, self.refresh_secs, &inner)
    }
}

/// Complete HTML document around `body`
pub fn document(title: &str, refresh_secs: Option<u64>, body: &str) -> String {
    let refresh = refresh_secs
        .map(|secs| format!(r#"<meta http-equiv="refresh" content="{}">"#, secs))
        .unwrap_or_default();

    format!(
        r#"<!doctype html><html lang="pt-BR"><head><meta charset="utf-8"><meta name="viewport" content="width=device-width, initial-scale=1">{refresh}<title>{title} | Harbor</title><link rel="stylesheet" href="{STYLESHEET_PATH}"></head><body>{body}</body></html>"#,
        title = escape(title),
    )
}

/// Embedded stylesheet served at [`STYLESHEET_PATH`]
pub const STYLESHEET: &str = r#"
:root { --ink: #0f172a; --muted: #64748b; --line: #e2e8f0; --accent: #0f766e; --danger: #dc2626; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, sans-serif; color: var(--ink); background: #f8fafc; }
.layout { display: grid; grid-template-columns: 220px 1fr; min-height: 100vh; }
.sidebar { background: var(--ink); color: #e2e8f0; padding: 24px 16px; display: flex; flex-direction: column; gap: 24px; }
.sidebar__nav { display: flex; flex-direction: column; gap: 4px; flex: 1; }
.sidebar__link { color: #cbd5e1; text-decoration: none; padding: 8px 10px; border-radius: 6px; }
.sidebar__link--active { background: var(--accent); color: #fff; }
.content { padding: 24px 32px; display: flex; flex-direction: column; gap: 20px; }
.content__header { display: flex; justify-content: space-between; align-items: flex-end; gap: 16px; }
.content__actions, .row-actions { display: flex; gap: 8px; align-items: center; flex-wrap: wrap; }
.eyebrow { text-transform: uppercase; font-size: 11px; letter-spacing: .08em; color: var(--muted); margin: 0; }
.subtitle, .muted { color: var(--muted); }
.panel, .stat-card { background: #fff; border: 1px solid var(--line); border-radius: 10px; padding: 16px; }
.panel__header { display: flex; justify-content: space-between; align-items: center; }
.stats-grid { display: grid; grid-template-columns: repeat(4, 1fr); gap: 16px; }
.stats-grid--three { grid-template-columns: repeat(3, 1fr); }
.panel-grid { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; }
.stat-card__label { color: var(--muted); margin: 0; }
.stat-card__value { font-size: 28px; font-weight: 700; margin: 6px 0; }
.stat-card__value.small { font-size: 15px; }
table { width: 100%; border-collapse: collapse; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid var(--line); }
.mono { font-family: ui-monospace, monospace; }
.pill { display: inline-block; padding: 2px 10px; border-radius: 999px; background: #e2e8f0; font-size: 12px; }
.pill--positive { background: #ccfbf1; color: #0f766e; }
.pill--negative { background: #fee2e2; color: #b91c1c; }
.pill--warning { background: #fef3c7; color: #b45309; }
button, .button-link { background: var(--accent); color: #fff; border: 0; border-radius: 6px; padding: 8px 14px; cursor: pointer; text-decoration: none; font: inherit; }
button.ghost, .ghost { background: transparent; color: inherit; border: 1px solid var(--line); }
button.danger { background: var(--danger); }
button[disabled] { opacity: .5; cursor: not-allowed; }
.filters { display: grid; grid-template-columns: repeat(4, 1fr); gap: 12px; align-items: end; }
.filters--two { grid-template-columns: repeat(2, 1fr); }
.filters label, .login-form label { display: flex; flex-direction: column; gap: 4px; font-size: 13px; }
input, select { padding: 8px; border: 1px solid var(--line); border-radius: 6px; font: inherit; }
.form-error { color: var(--danger); }
.form-success { color: var(--accent); }
.pagination { display: flex; justify-content: space-between; align-items: center; margin-top: 12px; }
.timeline { list-style: none; padding: 0; margin: 0; }
.timeline li { border-bottom: 1px solid var(--line); padding: 8px 0; }
.timeline p { margin: 2px 0; }
.key-list { list-style: none; padding: 0; }
.key-list li { display: flex; justify-content: space-between; padding: 6px 0; border-bottom: 1px solid var(--line); }
.json-block { background: #0f172a; color: #e2e8f0; padding: 12px; border-radius: 8px; overflow: auto; }
.donut { position: relative; width: 180px; margin: 0 auto; }
.donut__base { fill: transparent; stroke: #e2e8f0; stroke-width: 4; }
.donut__center { position: absolute; inset: 0; display: flex; flex-direction: column; align-items: center; justify-content: center; }
.donut__total { font-size: 24px; font-weight: 700; }
.legend, .bar-list { list-style: none; padding: 0; }
.legend li { display: flex; gap: 8px; align-items: center; }
.legend__swatch { width: 10px; height: 10px; border-radius: 2px; display: inline-block; }
.legend__value { margin-left: auto; }
.bar-list__meta { display: flex; justify-content: space-between; }
.bar-list__track { background: #f1f5f9; border-radius: 4px; height: 8px; margin: 4px 0 10px; }
.bar-list__fill { display: block; height: 100%; border-radius: 4px; }
.login-screen { min-height: 100vh; display: flex; align-items: center; justify-content: center; }
.login-card { background: #fff; border: 1px solid var(--line); border-radius: 12px; padding: 32px; width: 380px; }
.login-form { display: flex; flex-direction: column; gap: 12px; }
.confirm-card { max-width: 480px; }
"#;
