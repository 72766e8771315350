//! Query string construction for list endpoints

use url::form_urlencoded;

/// Percent-encode a single path segment
pub fn path_segment(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// Sort direction accepted by the list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Paging parameters shared by every list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub order: SortOrder,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            order: SortOrder::Desc,
        }
    }
}

impl ListParams {
    /// The first `per_page` records, newest first
    pub fn latest(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page,
            order: SortOrder::Desc,
        }
    }

    pub fn page(page: u32, per_page: u32) -> Self {
        Self {
            page,
            per_page,
            order: SortOrder::Desc,
        }
    }

    pub(crate) fn append_to(&self, params: QueryParams) -> QueryParams {
        params
            .push("page", self.page.to_string())
            .push("per_page", self.per_page.to_string())
            .push("order", self.order.as_str())
    }
}

/// Ordered query parameters.
///
/// Empty values and empty lists are omitted; list values are repeated under
/// the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a single value, skipped when empty
    pub fn push(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.pairs.push((key.to_string(), value));
        }
        self
    }

    /// Append every non-empty entry of a list under the same key
    pub fn push_all<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            let value = value.as_ref();
            if !value.is_empty() {
                self.pairs.push((key.to_string(), value.to_string()));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encoded query, prefixed with `?`, or an empty string
    pub fn to_query_string(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        format!("?{}", encoded)
    }
}
