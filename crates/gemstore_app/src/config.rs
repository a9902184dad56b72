//! RON configuration for the notifier binary.
//!
//! Every key has a default except `webhook_url`, which may also come from the
//! `GEMSTORE_WEBHOOK_URL` environment variable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gemstore_engine::{
    FetchSettings, PipelineConfig, WebhookSettings, DEFAULT_API_URL, DEFAULT_CONTACT,
    DEFAULT_PAGE_NAME,
};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const WEBHOOK_ENV: &str = "GEMSTORE_WEBHOOK_URL";
pub const PLACEHOLDER_WEBHOOK: &str = "https://discord.com/api/webhooks/REPLACE_ME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("no webhook configured; set `webhook_url` in the config or {WEBHOOK_ENV}")]
    MissingWebhook,
    #[error("`webhook_url` still holds the placeholder value")]
    PlaceholderWebhook,
    #[error("`webhook_url` is not an http(s) url: {0}")]
    InvalidWebhook(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub webhook_url: Option<String>,
    /// Wiki page with the store data.
    pub page_name: String,
    pub api_url: String,
    /// Page linked from notifications.
    pub store_page_url: String,
    pub watch_list_path: PathBuf,
    pub state_path: PathBuf,
    /// Appended to on every run; `None` logs to the terminal only.
    pub log_path: Option<PathBuf>,
    pub contact: String,
    pub fetch_timeout_secs: u64,
    pub dispatch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: None,
            page_name: DEFAULT_PAGE_NAME.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            store_page_url: "https://wiki.guildwars2.com/wiki/Gem_Store".to_string(),
            watch_list_path: PathBuf::from("watch_list.txt"),
            state_path: PathBuf::from("last_updated.txt"),
            log_path: Some(PathBuf::from("gemstore.log")),
            contact: DEFAULT_CONTACT.to_string(),
            fetch_timeout_secs: 10,
            dispatch_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Reads `path`. `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::parse(&text)
            .map(Some)
            .map_err(|message| ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            })
    }

    pub fn parse(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    /// The destination to post to. A non-empty `env_override` wins over the file.
    pub fn resolve_webhook(&self, env_override: Option<String>) -> Result<String, ConfigError> {
        let raw = env_override
            .filter(|value| !value.trim().is_empty())
            .or_else(|| self.webhook_url.clone())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::MissingWebhook)?;

        if raw == PLACEHOLDER_WEBHOOK || raw.contains("REPLACE_ME") {
            return Err(ConfigError::PlaceholderWebhook);
        }
        let parsed = Url::parse(&raw).map_err(|err| ConfigError::InvalidWebhook(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidWebhook(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }
        Ok(raw)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let timeout = Duration::from_secs(self.fetch_timeout_secs);
        FetchSettings {
            api_url: self.api_url.clone(),
            contact: self.contact.clone(),
            connect_timeout: timeout,
            request_timeout: timeout,
            ..FetchSettings::default()
        }
    }

    pub fn webhook_settings(&self, webhook_url: String) -> WebhookSettings {
        WebhookSettings {
            timeout: Duration::from_secs(self.dispatch_timeout_secs),
            ..WebhookSettings::new(webhook_url)
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            page_name: self.page_name.clone(),
            source_url: self.store_page_url.clone(),
        }
    }
}
