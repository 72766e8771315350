//! Status pill

use crate::components::html::escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Positive,
    Negative,
    Warning,
    Neutral,
}

impl StatusTone {
    pub fn class(&self) -> &'static str {
        match self {
            StatusTone::Positive => "pill pill--positive",
            StatusTone::Negative => "pill pill--negative",
            StatusTone::Warning => "pill pill--warning",
            StatusTone::Neutral => "pill",
        }
    }
}

/// Lowercased label and tone of a status, `unknown` when missing
pub fn status_tone(status: Option<&str>) -> (String, StatusTone) {
    let label = status
        .filter(|s| !s.is_empty())
        .unwrap_or("unknown")
        .to_lowercase();

    let tone = match label.as_str() {
        "success" | "completed" | "accepted" | "active" => StatusTone::Positive,
        "failure" | "rejected" | "cancelled" => StatusTone::Negative,
        "pending" | "scheduled" | "downloading" | "installing" => StatusTone::Warning,
        _ => StatusTone::Neutral,
    };

    (label, tone)
}

pub fn render(status: Option<&str>) -> String {
    let (label, tone) = status_tone(status);
    format!(r#"<span class="{}">{}</span>"#, tone.class(), escape(&label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_mapping() {
        for status in ["success", "completed", "accepted", "active"] {
            assert_eq!(status_tone(Some(status)).1, StatusTone::Positive);
        }
        for status in ["failure", "rejected", "cancelled"] {
            assert_eq!(status_tone(Some(status)).1, StatusTone::Negative);
        }
        for status in ["pending", "scheduled", "downloading", "installing"] {
            assert_eq!(status_tone(Some(status)).1, StatusTone::Warning);
        }
        assert_eq!(status_tone(Some("skipped")).1, StatusTone::Neutral);
    }

    #[test]
    fn test_label_is_lowercased() {
        assert_eq!(
            status_tone(Some("ACTIVE")),
            ("active".to_string(), StatusTone::Positive)
        );
        assert_eq!(
            status_tone(None),
            ("unknown".to_string(), StatusTone::Neutral)
        );
        assert_eq!(
            render(Some("Rejected")),
            r#"<span class="pill pill--negative">rejected</span>"#
        );
    }
}
