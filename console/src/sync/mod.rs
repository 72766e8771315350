pub mod auto_refresh;
pub mod filters;
pub mod list_view;
pub mod loader;
pub mod query_state;
