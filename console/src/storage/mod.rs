//! Durable console storage

pub mod layout;
pub mod settings;
