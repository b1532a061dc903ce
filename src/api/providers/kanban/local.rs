//! Local provider reading exported card JSON documents
//!
//! A "board" is a directory and each `*.json` file in it is a card. Card
//! documents may be the full card export (`{"checklists": [...]}`) or the
//! bare checklist array.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{BoardProvider, CardRef};
use crate::api::error::ApiError;
use crate::checklist::CardChecklists;

const PROVIDER_NAME: &str = "file";

/// Provider backed by card documents on disk
pub struct LocalFileProvider {
    root: PathBuf,
}

impl LocalFileProvider {
    /// Create a provider resolving relative references against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, reference: &str) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> ApiError {
    match err.kind() {
        ErrorKind::NotFound => ApiError::not_found(PROVIDER_NAME, path.display().to_string()),
        _ => ApiError::network(PROVIDER_NAME, format!("{}: {}", path.display(), err)),
    }
}

#[async_trait]
impl BoardProvider for LocalFileProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn test_connection(&self) -> Result<bool, ApiError> {
        Ok(tokio::fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn list_cards(&self, board: &str) -> Result<Vec<CardRef>, ApiError> {
        let dir = self.resolve(board);
        debug!("Listing card documents in {}", dir.display());

        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .map_err(|e| io_error(&dir, &e))?;

        let mut cards = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&dir, &e))? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            cards.push(CardRef {
                id: path.to_string_lossy().to_string(),
                name,
                url: None,
            });
        }

        cards.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(cards)
    }

    async fn fetch_checklists(&self, card: &str) -> Result<CardChecklists, ApiError> {
        let path = self.resolve(card);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(&path, &e))?;

        CardChecklists::from_json_str(&content).map_err(|e| {
            ApiError::invalid_response(PROVIDER_NAME, format!("{}: {}", path.display(), e))
        })
    }
}
