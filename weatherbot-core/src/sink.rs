//! Destinations for messages the bot sends on its own (startup notice,
//! daily alert).

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::fmt::Debug;

use crate::{
    Config,
    message::{Embed, Reply},
};

#[async_trait]
pub trait MessageSink: Send + Sync + Debug {
    async fn publish(&self, reply: &Reply) -> Result<()>;
}

/// Prints messages to standard output.
#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

#[async_trait]
impl MessageSink for StdoutSink {
    async fn publish(&self, reply: &Reply) -> Result<()> {
        println!("{reply}");
        Ok(())
    }
}

/// Body of a Discord-style webhook execution.
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "no_embeds")]
    embeds: &'a [Embed],
}

fn no_embeds(embeds: &&[Embed]) -> bool {
    embeds.is_empty()
}

impl<'a> WebhookPayload<'a> {
    fn from_reply(reply: &'a Reply) -> Self {
        match reply {
            Reply::Text(text) => Self {
                content: Some(text.as_str()),
                embeds: &[],
            },
            Reply::Embed(embed) => Self {
                content: None,
                embeds: std::slice::from_ref(embed),
            },
        }
    }
}

/// Posts messages to an incoming webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    url: String,
    http: Client,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: Client::new(),
        }
    }
}

#[async_trait]
impl MessageSink for WebhookSink {
    async fn publish(&self, reply: &Reply) -> Result<()> {
        let payload = WebhookPayload::from_reply(reply);

        let res = self
            .http
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .context("Failed to send message to webhook")?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "Webhook rejected message with status {}: {}",
                status,
                crate::provider::truncate_body(&body),
            ));
        }

        Ok(())
    }
}

/// Webhook sink when one is configured, stdout otherwise.
pub fn sink_from_config(config: &Config) -> Box<dyn MessageSink> {
    match &config.alert.webhook_url {
        Some(url) => Box::new(WebhookSink::new(url.clone())),
        None => Box::new(StdoutSink),
    }
}
