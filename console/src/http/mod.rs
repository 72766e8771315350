pub mod api;
pub mod audit;
pub mod auth;
pub mod client;
pub mod deployments;
pub mod devices;
pub mod query;
