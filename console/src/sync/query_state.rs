//! URL query state

use axum::response::{IntoResponse, Redirect, Response};
use url::form_urlencoded;

/// Decoded query string, order preserving
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryMap {
    pairs: Vec<(String, String)>,
}

impl QueryMap {
    pub fn parse(raw: Option<&str>) -> Self {
        let pairs = raw
            .map(|raw| {
                form_urlencoded::parse(raw.trim_start_matches('?').as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default();
        Self { pairs }
    }

    /// First value stored under `key`, empty when absent
    pub fn get(&self, key: &str) -> &str {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    /// Set or remove keys in place.
    ///
    /// An empty value removes the key. A non-empty value replaces the first
    /// occurrence and drops the rest, or is appended when the key is new.
    pub fn patch<'a, I>(&mut self, patch: I)
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        for (key, value) in patch {
            if value.is_empty() {
                self.pairs.retain(|(k, _)| k != key);
                continue;
            }

            match self.pairs.iter().position(|(k, _)| k == key) {
                Some(index) => {
                    self.pairs[index].1 = value;
                    let mut seen = 0;
                    self.pairs.retain(|(k, _)| {
                        if k != key {
                            return true;
                        }
                        seen += 1;
                        seen == 1
                    });
                }
                None => self.pairs.push((key.to_string(), value)),
            }
        }
    }

    pub fn patched<'a, I>(&self, patch: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, String)>,
    {
        let mut next = self.clone();
        next.patch(patch);
        next
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `path` followed by the encoded query, if any
    pub fn to_url(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        format!("{}?{}", path, encoded)
    }
}

/// Page number carried by the `page` query key.
///
/// Anything that is not a finite number of at least one collapses to 1;
/// fractions are floored.
pub fn parse_page(raw: &str) -> u32 {
    let value = if raw.trim().is_empty() {
        1.0
    } else {
        raw.trim().parse::<f64>().unwrap_or(f64::NAN)
    };

    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    value.floor().min(u32::MAX as f64) as u32
}

/// How the browser should move to a new URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// A new history entry
    Push(String),
    /// Replace the current entry, the bad URL is not kept
    Replace(String),
}

impl Navigation {
    pub fn url(&self) -> &str {
        match self {
            Navigation::Push(url) | Navigation::Replace(url) => url,
        }
    }
}

impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        match self {
            Navigation::Push(url) => Redirect::to(&url).into_response(),
            Navigation::Replace(url) => Redirect::temporary(&url).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(""), 1);
        assert_eq!(parse_page("3"), 3);
        assert_eq!(parse_page("2.9"), 2);
        assert_eq!(parse_page("0"), 1);
        assert_eq!(parse_page("-4"), 1);
        assert_eq!(parse_page("abc"), 1);
        assert_eq!(parse_page("inf"), 1);
        assert_eq!(parse_page("NaN"), 1);
    }

    #[test]
    fn test_patch_keeps_position_and_removes_empty() {
        let mut query = QueryMap::parse(Some("status=active&page=3"));
        query.patch([("page", "2".to_string())]);
        assert_eq!(query.to_url("/deployments"), "/deployments?status=active&page=2");

        query.patch([("status", String::new()), ("page", String::new())]);
        assert!(query.is_empty());
        assert_eq!(query.to_url("/deployments"), "/deployments");
    }

    #[test]
    fn test_patch_collapses_duplicates() {
        let mut query = QueryMap::parse(Some("tag=a&page=2&tag=b"));
        query.patch([("tag", "c".to_string())]);
        assert_eq!(query.to_url("/devices"), "/devices?tag=c&page=2");
    }

    #[test]
    fn test_decoding() {
        let query = QueryMap::parse(Some("?tag=production%2C+rack-01&status="));
        assert_eq!(query.get("tag"), "production, rack-01");
        assert_eq!(query.get("status"), "");
        assert_eq!(query.get("missing"), "");
    }
}
