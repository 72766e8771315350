use crate::components::html::escape;

/// Labelled figure with a hint line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: String,
    pub value: String,
    pub hint: String,
}

impl StatCard {
    pub fn new(label: &str, value: impl ToString, hint: impl Into<String>) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            hint: hint.into(),
        }
    }

    pub fn render(&self) -> String {
        format!(
            r#"<article class="stat-card"><p class="stat-card__label">{}</p><p class="stat-card__value">{}</p><p class="stat-card__hint">{}</p></article>"#,
            escape(&self.label),
            escape(&self.value),
            escape(&self.hint),
        )
    }
}

/// Stat card whose value is pre-rendered HTML
pub fn render_raw(label: &str, value_html: &str, hint: &str) -> String {
    format!(
        r#"<article class="stat-card"><p class="stat-card__label">{}</p><p>{}</p><p class="stat-card__hint">{}</p></article>"#,
        escape(label),
        value_html,
        escape(hint),
    )
}

/// Stat card with a smaller value line, used for timestamps
pub fn render_small(label: &str, value: &str, hint: &str) -> String {
    format!(
        r#"<article class="stat-card"><p class="stat-card__label">{}</p><p class="stat-card__value small">{}</p><p class="stat-card__hint">{}</p></article>"#,
        escape(label),
        escape(value),
        escape(hint),
    )
}
