//! API client modules for external service integrations
//!
//! This module provides:
//! - Board provider traits and implementations (Trello, local files)
//! - Error handling for provider failures

pub mod error;
pub mod providers;

pub use error::ApiError;
pub use providers::kanban::{get_provider, parse_board_ref, parse_card_ref, RefError};
pub use providers::{BoardProvider, CardRef, LocalFileProvider, TrelloProvider};
