//! Action feedback shown once on the next render of a view

use std::collections::HashMap;
use std::sync::Mutex;

use crate::components::html::{inline_error, inline_success};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FlashKind::Error,
            message: message.into(),
        }
    }

    pub fn render(&self) -> String {
        match self.kind {
            FlashKind::Success => inline_success(Some(&self.message)),
            FlashKind::Error => inline_error(Some(&self.message)),
        }
    }
}

pub fn render_all(flashes: &[Flash]) -> String {
    flashes.iter().map(Flash::render).collect()
}

/// Pending feedback keyed by view path
#[derive(Default)]
pub struct FlashBoard {
    entries: Mutex<HashMap<String, Vec<Flash>>>,
}

impl FlashBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the feedback of a view
    pub fn post(&self, path: &str, flash: Flash) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(path.to_string(), vec![flash]);
    }

    pub fn take(&self, path: &str) -> Vec<Flash> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(path).unwrap_or_default()
    }

    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_shown_once() {
        let board = FlashBoard::new();
        board.post("/deployments", Flash::error("Falha ao cancelar deployment"));
        board.post("/deployments", Flash::success("Deployment abc cancelado com sucesso."));

        let flashes = board.take("/deployments");
        assert_eq!(flashes, vec![Flash::success("Deployment abc cancelado com sucesso.")]);
        assert!(board.take("/deployments").is_empty());
        assert!(board.take("/devices").is_empty());
    }
}
