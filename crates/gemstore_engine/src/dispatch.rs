use std::time::Duration;

use gemstore_core::{DispatchResult, Message};
use gemstore_logging::{gem_debug, gem_warn};
use reqwest::header::CONTENT_TYPE;
use serde_json::{json, Value};

/// Longest response body quoted back in a failed [`DispatchResult`].
const MAX_ERROR_BODY: usize = 200;

#[async_trait::async_trait]
pub trait Dispatcher: Send + Sync {
    /// Delivers `message`. Failures are reported in the result, never raised.
    async fn send(&self, message: &Message) -> DispatchResult;
}

#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub webhook_url: String,
    /// Display name the webhook posts under.
    pub username: String,
    pub timeout: Duration,
}

impl WebhookSettings {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        Self {
            webhook_url: webhook_url.into(),
            username: gemstore_core::BRAND_NAME.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Posts messages as a single Discord embed.
#[derive(Debug, Clone)]
pub struct DiscordWebhookDispatcher {
    settings: WebhookSettings,
}

impl DiscordWebhookDispatcher {
    pub fn new(settings: WebhookSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Dispatcher for DiscordWebhookDispatcher {
    async fn send(&self, message: &Message) -> DispatchResult {
        let client = match reqwest::Client::builder()
            .timeout(self.settings.timeout)
            .build()
        {
            Ok(client) => client,
            Err(err) => return failure(format!("client setup failed: {err}")),
        };

        let payload = discord_payload(&self.settings.username, message);
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(err) => return failure(format!("payload encoding failed: {err}")),
        };

        gem_debug!("Posting {} byte webhook payload", body.len());
        let response = match client
            .post(self.settings.webhook_url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return failure(format!("request failed: {err}")),
        };

        let status = response.status();
        if status.is_success() {
            return DispatchResult {
                success: true,
                status_text: status.to_string(),
            };
        }

        let detail = response.text().await.unwrap_or_default();
        let detail = truncate(detail.trim(), MAX_ERROR_BODY);
        gem_warn!("Webhook rejected message: {} {}", status, detail);
        DispatchResult {
            success: false,
            status_text: if detail.is_empty() {
                status.to_string()
            } else {
                format!("{status}: {detail}")
            },
        }
    }
}

/// Discord `execute webhook` body with one embed.
pub fn discord_payload(username: &str, message: &Message) -> Value {
    json!({
        "username": username,
        "embeds": [{
            "title": message.title,
            "description": message.description,
            "url": message.url,
            "color": message.color,
            "author": {
                "name": message.author.name,
                "url": message.author.url,
                "icon_url": message.author.icon_url,
            },
            "fields": message.fields.iter().map(|field| {
                json!({
                    "name": field.name,
                    "value": field.value,
                    "inline": field.inline,
                })
            }).collect::<Vec<_>>(),
        }]
    })
}

fn failure(status_text: String) -> DispatchResult {
    gem_warn!("Webhook dispatch failed: {}", status_text);
    DispatchResult {
        success: false,
        status_text,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut end = max;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}
