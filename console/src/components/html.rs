//! HTML text helpers

/// Escape text for element content and quoted attribute values
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub use crate::http::query::path_segment;

/// `<p>` with an inline error, empty without a message
pub fn inline_error(message: Option<&str>) -> String {
    match message.filter(|m| !m.is_empty()) {
        Some(message) => format!(
            r#"<p class="form-error form-error--inline">{}</p>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

pub fn inline_success(message: Option<&str>) -> String {
    match message.filter(|m| !m.is_empty()) {
        Some(message) => format!(
            r#"<p class="form-success form-success--inline">{}</p>"#,
            escape(message)
        ),
        None => String::new(),
    }
}

/// `disabled` attribute when `flag` holds
pub fn disabled(flag: bool) -> &'static str {
    if flag {
        " disabled"
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
