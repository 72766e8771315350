//! Query-state synchronization of a paginated list view

use crate::http::query::ListParams;
use crate::sync::filters::Filters;
use crate::sync::query_state::{parse_page, Navigation, QueryMap};

/// URL-derived state of a list page
#[derive(Debug, Clone)]
pub struct ListView<F: Filters> {
    path: String,
    query: QueryMap,
    pub filters: F,
    pub page: u32,
    /// Values backing the filter form
    pub draft: F,
}

impl<F: Filters> ListView<F> {
    pub fn from_query(path: impl Into<String>, raw_query: Option<&str>) -> Self {
        let query = QueryMap::parse(raw_query);
        let filters = F::from_query(&query);
        let page = parse_page(query.get("page"));

        let mut view = Self {
            path: path.into(),
            query,
            draft: filters.clone(),
            filters,
            page,
        };
        view.sync_draft();
        view
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reset the form to the filters the URL currently holds
    pub fn sync_draft(&mut self) {
        self.draft = self.filters.clone();
    }

    pub fn canonical_url(&self) -> String {
        self.query.to_url(&self.path)
    }

    /// Paging parameters for the API request
    pub fn list_params(&self, per_page: u32) -> ListParams {
        ListParams::page(self.page, per_page)
    }

    pub fn params(&self, per_page: u32) -> F::Params {
        self.filters.to_params(self.list_params(per_page))
    }

    /// Write the submitted form into the URL, back to the first page
    pub fn submit(&self, draft: &F) -> Navigation {
        let mut patch = draft.fields();
        patch.push(("page", String::new()));
        Navigation::Push(self.query.patched(patch).to_url(&self.path))
    }

    /// Drop every filter and the page from the URL
    pub fn clear(&self) -> Navigation {
        let mut patch = F::default().fields();
        patch.push(("page", String::new()));
        Navigation::Push(self.query.patched(patch).to_url(&self.path))
    }

    /// URL of another page; the first page carries no `page` key
    pub fn page_url(&self, page: u32) -> String {
        let value = if page > 1 { page.to_string() } else { String::new() };
        self.query.patched([("page", value)]).to_url(&self.path)
    }

    pub fn goto_page(&self, page: u32) -> Navigation {
        Navigation::Push(self.page_url(page))
    }

    /// Correct a page beyond the reported page count.
    ///
    /// Empty results count as a single page.
    pub fn reconcile(&self, total_pages: u32) -> Option<Navigation> {
        let total_pages = total_pages.max(1);
        if self.page > total_pages {
            return Some(Navigation::Replace(self.page_url(total_pages)));
        }
        None
    }
}
