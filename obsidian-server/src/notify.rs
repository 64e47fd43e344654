use obsidian_shared::config;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::error::Error;

/// Discord rejects embed field values longer than this.
pub const MAX_FIELD_VALUE_CHARS: usize = 1024;

/// A message in Discord's webhook format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebhookMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Embed {
    pub title: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    /// RFC 3339, UTC.
    pub timestamp: String,
}
impl Embed {
    #[cfg(test)]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}
impl EmbedField {
    pub fn new(name: &str, value: &str, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: truncate(value, MAX_FIELD_VALUE_CHARS),
            inline,
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max_chars - 3).collect();
    truncated.push_str("...");
    truncated
}

/// Somewhere form submissions can be delivered.
pub trait Notify {
    fn notify(&self, message: &WebhookMessage) -> impl Future<Output = Result<(), Error>> + Send;
}

pub struct DiscordWebhook {
    client: reqwest::Client,
    config: config::Discord,
}
impl DiscordWebhook {
    pub const MISSING_WEBHOOK_URL: &str = "Missing DISCORD_WEBHOOK_URL environment variable.";

    pub fn new(client: reqwest::Client, config: config::Discord) -> Self {
        Self { client, config }
    }
}
impl Notify for DiscordWebhook {
    async fn notify(&self, message: &WebhookMessage) -> Result<(), Error> {
        let url = self
            .config
            .webhook_url()
            .ok_or_else(|| Error::Configuration(Self::MISSING_WEBHOOK_URL.to_string()))?;

        let body = serde_json::to_vec(message)
            .map_err(|e| Error::NotificationDelivery(format!("Failed to encode message: {e}")))?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Error::NotificationDelivery(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::NotificationDelivery(format!(
                "Webhook error ({status}): {text}"
            )));
        }

        tracing::info!("forwarded \"{}\" to webhook", message_title(message));
        Ok(())
    }
}

fn message_title(message: &WebhookMessage) -> &str {
    message
        .embeds
        .first()
        .map(|e| e.title.as_str())
        .unwrap_or_default()
}
