use chrono::{DateTime, Utc};
use obsidian_catalog::LABEL_NAME;
use serde::Deserialize;

use crate::{
    error::Error,
    notify::{Embed, EmbedField, WebhookMessage},
};

const NOT_PROVIDED: &str = "Not provided";

const DEMO_COLOR: u32 = 0x8B5CF6;
const CONTACT_COLOR: u32 = 0x38BDF8;

/// The value, unless it is missing or empty.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn or_not_provided(value: &Option<String>) -> &str {
    present(value).unwrap_or(NOT_PROVIDED)
}

fn missing_fields_error(missing: &[&str]) -> Error {
    Error::Validation(format!("Missing required fields: {}.", missing.join(", ")))
}

fn message(title: &str, color: u32, fields: Vec<EmbedField>, now: DateTime<Utc>) -> WebhookMessage {
    WebhookMessage {
        username: LABEL_NAME.to_string(),
        embeds: vec![Embed {
            title: title.to_string(),
            color,
            fields,
            timestamp: now.to_rfc3339(),
        }],
    }
}

/// A demo sent in through the submissions page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DemoSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub artist_name: Option<String>,
    pub project_title: Option<String>,
    pub links: Option<String>,
    pub message: Option<String>,
    pub confirm_rights: Option<bool>,
}
impl DemoSubmission {
    /// Validate the submission and turn it into a webhook message.
    pub fn into_message(self, now: DateTime<Utc>) -> Result<WebhookMessage, Error> {
        let mut missing = vec![];
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("artistName", &self.artist_name),
            ("links", &self.links),
        ] {
            if present(value).is_none() {
                missing.push(field);
            }
        }
        if self.confirm_rights != Some(true) {
            missing.push("confirmRights");
        }
        if !missing.is_empty() {
            return Err(missing_fields_error(&missing));
        }

        let fields = vec![
            EmbedField::new("Name", or_not_provided(&self.name), true),
            EmbedField::new("Email", or_not_provided(&self.email), true),
            EmbedField::new("Artist Name", or_not_provided(&self.artist_name), true),
            EmbedField::new("Project Title", or_not_provided(&self.project_title), true),
            EmbedField::new("Links", or_not_provided(&self.links), false),
            EmbedField::new("Message", or_not_provided(&self.message), false),
            EmbedField::new("Rights Confirmed", "Yes", true),
        ];
        Ok(message("New Demo Submission", DEMO_COLOR, fields, now))
    }
}

/// A message sent in through the contact page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub topic: Option<String>,
    pub message: Option<String>,
}
impl ContactMessage {
    /// Validate the message and turn it into a webhook message.
    pub fn into_message(self, now: DateTime<Utc>) -> Result<WebhookMessage, Error> {
        let missing: Vec<&str> = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(missing_fields_error(&missing));
        }

        let fields = vec![
            EmbedField::new("Name", or_not_provided(&self.name), true),
            EmbedField::new("Email", or_not_provided(&self.email), true),
            EmbedField::new("Topic", or_not_provided(&self.topic), true),
            EmbedField::new("Message", or_not_provided(&self.message), false),
        ];
        Ok(message("New Contact Message", CONTACT_COLOR, fields, now))
    }
}
