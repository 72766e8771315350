//! SVG donut and bar-list charts

use crate::components::html::escape;

const DONUT_COLORS: [&str; 6] = ["#0f766e", "#d97706", "#dc2626", "#334155", "#7c3aed", "#4d7c0f"];
const BAR_COLORS: [&str; 6] = ["#0f766e", "#2563eb", "#f59e0b", "#7c3aed", "#ef4444", "#475569"];

/// A labelled count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartItem {
    pub label: String,
    pub value: u64,
}

impl ChartItem {
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One arc of the donut, in percent of the circumference
#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub label: String,
    pub value: u64,
    pub color: &'static str,
    pub percent: f64,
    pub offset: f64,
}

impl DonutSegment {
    pub fn dash_array(&self) -> String {
        format!("{} {}", self.percent, 100.0 - self.percent)
    }
}

/// Arcs of the non-zero items; each starts where the previous ended
pub fn donut_segments(items: &[ChartItem]) -> (u64, Vec<DonutSegment>) {
    let total: u64 = items.iter().map(|i| i.value).sum();
    let mut cursor = 0.0;

    let segments = items
        .iter()
        .filter(|item| item.value > 0)
        .enumerate()
        .map(|(index, item)| {
            let ratio = if total > 0 {
                item.value as f64 / total as f64
            } else {
                0.0
            };
            let segment = DonutSegment {
                label: item.label.clone(),
                value: item.value,
                color: DONUT_COLORS[index % DONUT_COLORS.len()],
                percent: ratio * 100.0,
                offset: 0.0 - cursor,
            };
            cursor += ratio * 100.0;
            segment
        })
        .collect();

    (total, segments)
}

/// Bar widths in percent of the largest value, never dividing by zero
pub fn bar_widths(items: &[ChartItem]) -> Vec<f64> {
    let max = items.iter().map(|i| i.value).max().unwrap_or(0).max(1);
    items
        .iter()
        .map(|item| item.value as f64 / max as f64 * 100.0)
        .collect()
}

pub fn render_donut(title: &str, items: &[ChartItem]) -> String {
    let (total, segments) = donut_segments(items);

    let arcs: String = segments
        .iter()
        .map(|s| {
            format!(
                r#"<circle cx="21" cy="21" r="15.915" fill="transparent" stroke="{}" stroke-width="4" stroke-dasharray="{}" stroke-dashoffset="{}" transform="rotate(-90 21 21)"/>"#,
                s.color,
                s.dash_array(),
                s.offset,
            )
        })
        .collect();

    let legend: String = segments
        .iter()
        .map(|s| {
            format!(
                r#"<li><span class="legend__swatch" style="background-color: {}"></span><span class="legend__label">{}</span><span class="legend__value">{}</span></li>"#,
                s.color,
                escape(&s.label),
                s.value,
            )
        })
        .collect();

    format!(
        r#"<article class="panel chart-card"><h3>{title}</h3><div class="donut"><svg viewBox="0 0 42 42" class="donut__svg" aria-label="{title}"><circle class="donut__base" cx="21" cy="21" r="15.915"/>{arcs}</svg><div class="donut__center"><span class="donut__total">{total}</span><span class="donut__caption">total</span></div></div><ul class="legend">{legend}</ul></article>"#,
        title = escape(title),
    )
}

pub fn render_bar_list(title: &str, items: &[ChartItem]) -> String {
    let widths = bar_widths(items);

    let rows: String = items
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (item, width))| {
            format!(
                r#"<li><div class="bar-list__meta"><span>{}</span><strong>{}</strong></div><div class="bar-list__track"><span class="bar-list__fill" style="width: {}%; background-color: {}"></span></div></li>"#,
                escape(&item.label),
                item.value,
                width,
                BAR_COLORS[index % BAR_COLORS.len()],
            )
        })
        .collect();

    format!(
        r#"<article class="panel chart-card"><h3>{}</h3><ul class="bar-list">{}</ul></article>"#,
        escape(title),
        rows
    )
}
