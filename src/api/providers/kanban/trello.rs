//! Trello board provider implementation

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

use super::{BoardProvider, CardRef};
use crate::api::error::ApiError;
use crate::checklist::{CardChecklists, Checklist};
use crate::config::TrelloConfig;

pub const TRELLO_API_URL: &str = "https://api.trello.com";
const PROVIDER_NAME: &str = "trello";

/// Trello REST API provider
pub struct TrelloProvider {
    base_url: String,
    api_key: String,
    token: String,
    client: Client,
}

impl TrelloProvider {
    /// Create a provider against a custom base URL (proxies, test servers)
    pub fn with_base_url(base_url: String, api_key: String, token: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            token,
            client: Client::new(),
        }
    }

    /// Create from config
    ///
    /// Credentials are read from the environment variables named in the config.
    pub fn from_config(config: &TrelloConfig) -> Result<Self, ApiError> {
        let key = env::var(&config.api_key_env).ok();
        let token = env::var(&config.token_env).ok();

        let (key, token) = match (key, token) {
            (Some(k), Some(t)) if !k.is_empty() && !t.is_empty() => (k, t),
            _ => return Err(ApiError::not_configured(PROVIDER_NAME)),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::network(PROVIDER_NAME, e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: key,
            token,
            client,
        })
    }

    /// Make an authenticated GET request
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/1{}", self.base_url, path);
        debug!("Trello GET: {}", url);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("token", self.token.as_str())])
            .query(query)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::network(PROVIDER_NAME, e.to_string()))?;

        let response = check_status(response, path).await?;

        response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(PROVIDER_NAME, e.to_string()))
    }
}

async fn check_status(response: Response, path: &str) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let body = response.text().await.unwrap_or_default();

    Err(match status.as_u16() {
        401 => ApiError::unauthorized(PROVIDER_NAME),
        403 => ApiError::forbidden(PROVIDER_NAME),
        404 => ApiError::not_found(PROVIDER_NAME, path),
        429 => ApiError::rate_limited(PROVIDER_NAME, retry_after),
        code => ApiError::http(PROVIDER_NAME, code, body),
    })
}

#[async_trait]
impl BoardProvider for TrelloProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn test_connection(&self) -> Result<bool, ApiError> {
        #[derive(Deserialize)]
        struct Member {
            #[allow(dead_code)]
            id: String,
        }

        match self
            .get::<Member>("/members/me", &[("fields", "id")])
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if e.is_auth_error() => {
                warn!("Trello authentication failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    async fn list_cards(&self, board: &str) -> Result<Vec<CardRef>, ApiError> {
        let path = format!("/boards/{}/cards", board);
        self.get(&path, &[("fields", "name,shortUrl")]).await
    }

    async fn fetch_checklists(&self, card: &str) -> Result<CardChecklists, ApiError> {
        let path = format!("/cards/{}/checklists", card);
        let checklists: Vec<Checklist> = self
            .get(&path, &[("fields", "name,pos"), ("checkItem_fields", "name,pos,state")])
            .await?;
        Ok(CardChecklists { checklists })
    }
}
