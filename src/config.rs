use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::providers::kanban::TRELLO_API_URL;
use crate::checklist::Mode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trello: TrelloConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Trello API access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrelloConfig {
    /// API root (default: https://api.trello.com)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Environment variable holding the API token
    #[serde(default = "default_token_env")]
    pub token_env: String,
    /// Per-request timeout in seconds (default: 10)
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    TRELLO_API_URL.to_string()
}

fn default_api_key_env() -> String {
    "NEXT_STEP_TRELLO_API_KEY".to_string()
}

fn default_token_env() -> String {
    "NEXT_STEP_TRELLO_TOKEN".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            token_env: default_token_env(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// How annotations are selected and printed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Mode used when none is given on the command line
    #[serde(default = "default_mode")]
    pub default_mode: Mode,
    /// Marker printed before each next step
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Print cards that have no next step
    #[serde(default)]
    pub show_empty_cards: bool,
}

fn default_mode() -> Mode {
    Mode::OnePerCard
}

fn default_marker() -> String {
    "◽️".to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_mode: default_mode(),
            marker: default_marker(),
            show_empty_cards: false,
        }
    }
}

/// Watch loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between full board re-scans (default: 60)
    #[serde(default = "default_refresh_interval")]
    pub interval_secs: u64,
}

fn default_refresh_interval() -> u64 {
    60
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_refresh_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether the watch loop logs to a file instead of stderr
    #[serde(default = "default_log_to_file")]
    pub to_file: bool,

    /// Directory for log files (default: platform state dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_to_file() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: default_log_to_file(),
            dir: None,
        }
    }
}

impl Config {
    /// Path to the user config file (~/.config/next-step/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("next-step").join("config.toml"))
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so the tool works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        if let Some(user_config) = Self::user_config_path() {
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with NEXT_STEP_ prefix, e.g. NEXT_STEP__DISPLAY__MARKER
        builder = builder.add_source(
            config::Environment::with_prefix("NEXT_STEP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        match &self.logging.dir {
            Some(dir) => {
                let path = PathBuf::from(dir);
                if path.is_absolute() {
                    path
                } else {
                    std::env::current_dir().unwrap_or_default().join(path)
                }
            }
            None => dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join("next-step")
                .join("logs"),
        }
    }
}
