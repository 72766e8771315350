//! Harbor management API models
//!
//! Request and response payloads exchanged with the `/management` endpoints
//! of the Harbor backend.

pub mod models;

pub use models::*;
