//! API error types for board providers

use std::fmt;

/// Errors that can occur when fetching board data
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 401 Unauthorized - key or token invalid or expired
    Unauthorized { provider: String },
    /// 403 Forbidden - token lacks access to the board
    Forbidden { provider: String },
    /// 404 Not Found - unknown card or board
    NotFound { provider: String, resource: String },
    /// 429 Rate Limited
    RateLimited {
        provider: String,
        retry_after_secs: Option<u64>,
    },
    /// Network or timeout error
    NetworkError { provider: String, message: String },
    /// Response body could not be decoded
    InvalidResponse { provider: String, message: String },
    /// Other HTTP errors
    HttpError {
        provider: String,
        status: u16,
        message: String,
    },
    /// Provider not configured (no credentials in environment)
    NotConfigured { provider: String },
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Get the provider name for this error
    pub fn provider_name(&self) -> &str {
        match self {
            ApiError::Unauthorized { provider }
            | ApiError::Forbidden { provider }
            | ApiError::NotFound { provider, .. }
            | ApiError::RateLimited { provider, .. }
            | ApiError::NetworkError { provider, .. }
            | ApiError::InvalidResponse { provider, .. }
            | ApiError::HttpError { provider, .. }
            | ApiError::NotConfigured { provider } => provider,
        }
    }

    /// Check if this is a rate limiting error
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// Get retry-after seconds if rate limited
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    pub fn unauthorized(provider: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            provider: provider.into(),
        }
    }

    pub fn forbidden(provider: impl Into<String>) -> Self {
        ApiError::Forbidden {
            provider: provider.into(),
        }
    }

    pub fn not_found(provider: impl Into<String>, resource: impl Into<String>) -> Self {
        ApiError::NotFound {
            provider: provider.into(),
            resource: resource.into(),
        }
    }

    pub fn rate_limited(provider: impl Into<String>, retry_after: Option<u64>) -> Self {
        ApiError::RateLimited {
            provider: provider.into(),
            retry_after_secs: retry_after,
        }
    }

    pub fn network(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn http(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        ApiError::HttpError {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn not_configured(provider: impl Into<String>) -> Self {
        ApiError::NotConfigured {
            provider: provider.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized { provider } => {
                write!(f, "{}: Unauthorized (401) - check API key and token", provider)
            }
            ApiError::Forbidden { provider } => {
                write!(f, "{}: Forbidden (403) - insufficient permissions", provider)
            }
            ApiError::NotFound { provider, resource } => {
                write!(f, "{}: Not found - {}", provider, resource)
            }
            ApiError::RateLimited {
                provider,
                retry_after_secs,
            } => {
                if let Some(secs) = retry_after_secs {
                    write!(f, "{}: Rate limited - retry after {}s", provider, secs)
                } else {
                    write!(f, "{}: Rate limited", provider)
                }
            }
            ApiError::NetworkError { provider, message } => {
                write!(f, "{}: Network error - {}", provider, message)
            }
            ApiError::InvalidResponse { provider, message } => {
                write!(f, "{}: Invalid response - {}", provider, message)
            }
            ApiError::HttpError {
                provider,
                status,
                message,
            } => {
                write!(f, "{}: HTTP {} - {}", provider, status, message)
            }
            ApiError::NotConfigured { provider } => {
                write!(f, "{}: Not configured (no API credentials)", provider)
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_auth_error() {
        assert!(ApiError::unauthorized("test").is_auth_error());
        assert!(ApiError::forbidden("test").is_auth_error());
        assert!(!ApiError::rate_limited("test", None).is_auth_error());
        assert!(!ApiError::network("test", "timeout").is_auth_error());
        assert!(!ApiError::not_found("test", "card abc").is_auth_error());
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(ApiError::unauthorized("trello").provider_name(), "trello");
        assert_eq!(ApiError::not_found("file", "x.json").provider_name(), "file");
        assert_eq!(
            ApiError::rate_limited("trello", Some(10)).provider_name(),
            "trello"
        );
    }

    #[test]
    fn test_retry_after() {
        assert_eq!(ApiError::rate_limited("trello", Some(10)).retry_after(), Some(10));
        assert!(ApiError::rate_limited("trello", None).is_rate_limited());
        assert_eq!(ApiError::http("trello", 500, "boom").retry_after(), None);
    }

    #[test]
    fn test_display() {
        let err = ApiError::rate_limited("trello", Some(30));
        assert_eq!(err.to_string(), "trello: Rate limited - retry after 30s");

        let err = ApiError::not_configured("trello");
        assert_eq!(err.to_string(), "trello: Not configured (no API credentials)");

        let err = ApiError::not_found("trello", "card abc123");
        assert_eq!(err.to_string(), "trello: Not found - card abc123");
    }
}
