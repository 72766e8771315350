//! Harbor Console Library
//!
//! Operator console for the Harbor OTA management API: session handling,
//! URL-driven list views, live dashboards and the HTTP server rendering them.

pub mod app;
pub mod authn;
pub mod components;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod pages;
pub mod server;
pub mod storage;
pub mod sync;
pub mod utils;
pub mod workers;
