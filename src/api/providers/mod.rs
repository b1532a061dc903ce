//! Provider trait definitions for external service integrations
//!
//! Board providers supply the cards of a board and the checklist payload of
//! each card.

pub mod kanban;

// Re-export commonly used types
pub use kanban::{BoardProvider, CardRef, LocalFileProvider, TrelloProvider};
