//! Board provider trait and implementations
//!
//! A provider lists the cards of a board and fetches the checklist payload of
//! a single card. Trello is the network-backed implementation; the local
//! provider reads exported card JSON documents from disk.

mod local;
mod trello;

pub use local::LocalFileProvider;
pub use trello::{TrelloProvider, TRELLO_API_URL};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::error::ApiError;
use crate::checklist::CardChecklists;
use crate::config::Config;

/// A card on a board, as listed by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRef {
    /// Identifier accepted by `fetch_checklists`
    pub id: String,
    /// Card title
    pub name: String,
    /// Link to the card in the provider's web UI (if any)
    #[serde(default, rename = "shortUrl", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Trait for providers that can supply checklist data for board cards
#[async_trait]
pub trait BoardProvider: Send + Sync {
    /// Get the provider name (e.g., "trello", "file")
    fn name(&self) -> &str;

    /// Test connectivity and credentials
    async fn test_connection(&self) -> Result<bool, ApiError>;

    /// List the cards of a board
    async fn list_cards(&self, board: &str) -> Result<Vec<CardRef>, ApiError>;

    /// Fetch the checklists of a single card
    async fn fetch_checklists(&self, card: &str) -> Result<CardChecklists, ApiError>;
}

/// Get a provider by name
///
/// `"trello"` reads credentials through the config; `"file"` resolves card
/// documents relative to the current directory.
pub fn get_provider(name: &str, config: &Config) -> Result<Box<dyn BoardProvider>, ApiError> {
    match name.to_lowercase().as_str() {
        "trello" => TrelloProvider::from_config(&config.trello)
            .map(|p| Box::new(p) as Box<dyn BoardProvider>),
        "file" => Ok(Box::new(LocalFileProvider::new("."))),
        other => Err(ApiError::not_configured(other)),
    }
}

/// Errors from parsing a card or board reference
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RefError {
    #[error("empty {0} reference")]
    Empty(&'static str),

    #[error("'{url}' is not a Trello {kind} link (expected https://trello.com/{prefix}/<id>)")]
    WrongKind {
        url: String,
        kind: &'static str,
        prefix: &'static str,
    },

    #[error("'{0}' is not a valid Trello identifier")]
    InvalidId(String),
}

/// Parse a board reference: a board id/short link or a `trello.com/b/...` URL
pub fn parse_board_ref(input: &str) -> Result<String, RefError> {
    parse_ref(input, "board", "b")
}

/// Parse a card reference: a card id/short link or a `trello.com/c/...` URL
pub fn parse_card_ref(input: &str) -> Result<String, RefError> {
    parse_ref(input, "card", "c")
}

fn parse_ref(input: &str, kind: &'static str, prefix: &'static str) -> Result<String, RefError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RefError::Empty(kind));
    }

    let id = if let Some(rest) = strip_trello_host(input) {
        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        match (segments.next(), segments.next()) {
            (Some(p), Some(id)) if p == prefix => id,
            _ => {
                return Err(RefError::WrongKind {
                    url: input.to_string(),
                    kind,
                    prefix,
                })
            }
        }
    } else {
        input
    };

    // Card pages are also reachable as `<url>.json`
    let id = id.strip_suffix(".json").unwrap_or(id);

    if id.chars().all(|c| c.is_ascii_alphanumeric()) && !id.is_empty() {
        Ok(id.to_string())
    } else {
        Err(RefError::InvalidId(id.to_string()))
    }
}

fn strip_trello_host(input: &str) -> Option<&str> {
    ["https://trello.com/", "http://trello.com/", "trello.com/"]
        .iter()
        .find_map(|host| input.strip_prefix(host))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_ids() {
        assert_eq!(parse_card_ref("aBc123XY").unwrap(), "aBc123XY");
        assert_eq!(parse_board_ref("  5f1e2d3c  ").unwrap(), "5f1e2d3c");
    }

    #[test]
    fn test_parse_card_url() {
        assert_eq!(
            parse_card_ref("https://trello.com/c/aBc123XY/42-ship-the-thing").unwrap(),
            "aBc123XY"
        );
        assert_eq!(
            parse_card_ref("http://trello.com/c/aBc123XY.json").unwrap(),
            "aBc123XY"
        );
    }

    #[test]
    fn test_parse_board_url() {
        assert_eq!(
            parse_board_ref("https://trello.com/b/Zz9Yy8/roadmap").unwrap(),
            "Zz9Yy8"
        );
    }

    #[test]
    fn test_parse_wrong_kind() {
        let err = parse_card_ref("https://trello.com/b/Zz9Yy8/roadmap").unwrap_err();
        assert!(matches!(err, RefError::WrongKind { kind: "card", .. }));
        assert!(parse_board_ref("https://trello.com/c/aBc123XY").is_err());
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_card_ref(""), Err(RefError::Empty("card")));
        assert_eq!(
            parse_card_ref("not an id"),
            Err(RefError::InvalidId("not an id".to_string()))
        );
    }

    #[test]
    fn test_get_provider() {
        let config = Config::default();
        assert_eq!(get_provider("FILE", &config).unwrap().name(), "file");
        assert!(get_provider("jira", &config).is_err());
    }

    #[test]
    fn test_card_ref_decodes_trello_fields() {
        let json = r#"{"id": "c1", "name": "Ship it", "shortUrl": "https://trello.com/c/xyz"}"#;
        let card: CardRef = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, "c1");
        assert_eq!(card.url.as_deref(), Some("https://trello.com/c/xyz"));

        let card: CardRef = serde_json::from_str(r#"{"id": "c2", "name": "Bare"}"#).unwrap();
        assert!(card.url.is_none());
    }
}
