use crate::domain::model::AlertMessage;
use crate::domain::ports::AlertChannel;
use crate::utils::error::{CheckError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct MarkdownPayload {
    msgtype: &'static str,
    markdown: MarkdownContent,
}

#[derive(Debug, Serialize)]
struct MarkdownContent {
    content: String,
}

impl MarkdownPayload {
    fn new(message: &AlertMessage) -> Self {
        Self {
            msgtype: "markdown",
            markdown: MarkdownContent {
                content: message.markdown(),
            },
        }
    }
}

/// Markdown webhook (WeCom group-bot compatible).
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    client: Client,
    url: Url,
}

impl WebhookChannel {
    pub fn new(url: Url, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("expiry-watch/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertChannel for WebhookChannel {
    async fn deliver(&self, message: &AlertMessage) -> Result<()> {
        let payload = MarkdownPayload::new(message);
        tracing::debug!("POST webhook payload to {}", self.url);

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| CheckError::Delivery {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CheckError::Delivery {
                message: format!("webhook returned {}", status),
            });
        }

        Ok(())
    }
}
