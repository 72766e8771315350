//! Utility functions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of characters kept by [`shorten_id`]
pub const DEFAULT_ID_PREFIX: usize = 8;

/// Version information for the console
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionInfo {
    pub version: String,
    pub git_hash: String,
    pub build_time: String,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown").to_string(),
        build_time: option_env!("BUILD_TIME").unwrap_or("unknown").to_string(),
    }
}

/// Truncate an identifier for compact display.
///
/// Returns `-` for an empty value, the value itself when it fits in `size`
/// characters, otherwise the first `size` characters followed by `...`.
pub fn shorten_id(value: &str, size: usize) -> String {
    if value.is_empty() {
        return "-".to_string();
    }

    if value.chars().count() <= size {
        return value.to_string();
    }

    let prefix: String = value.chars().take(size).collect();
    format!("{}...", prefix)
}

/// Render an optional timestamp, `-` when absent
pub fn format_timestamp(value: Option<&DateTime<Utc>>) -> String {
    match value {
        Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        None => "-".to_string(),
    }
}

/// Join a list for display, `-` when empty
pub fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.join(", ")
    }
}

/// The value, or `-` when it is empty
pub fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_shorten_id_keeps_short_values() {
        assert_eq!(shorten_id("abc", 8), "abc");
        assert_eq!(shorten_id("abcdefgh", 8), "abcdefgh");
    }

    #[test]
    fn test_shorten_id_truncates() {
        assert_eq!(
            shorten_id("0b6f8a52-1d7e-4c1a-9a55-3a1f2b7c9d10", DEFAULT_ID_PREFIX),
            "0b6f8a52..."
        );
        assert_eq!(shorten_id("0b6f8a52-1d7e", 12), "0b6f8a52-1d7...");
    }

    #[test]
    fn test_shorten_id_empty() {
        assert_eq!(shorten_id("", 8), "-");
        assert_eq!(shorten_id("", 0), "-");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 8, 5, 9).unwrap();
        assert_eq!(format_timestamp(Some(&ts)), "2025-03-01 08:05:09 UTC");
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn test_join_or_dash() {
        assert_eq!(join_or_dash(&[]), "-");
        assert_eq!(
            join_or_dash(&["production".to_string(), "rack-01".to_string()]),
            "production, rack-01"
        );
    }
}
