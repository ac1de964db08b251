use crate::adapters::webhook::WebhookChannel;
use crate::domain::model::{AlertMessage, DeliveryStatus};
use crate::domain::ports::AlertChannel;
use crate::utils::error::Result;
use std::time::Duration;
use url::Url;

pub struct Notifier {
    channel: Option<Box<dyn AlertChannel>>,
}

impl Notifier {
    pub fn new(channel: impl AlertChannel + 'static) -> Self {
        Self {
            channel: Some(Box::new(channel)),
        }
    }

    pub fn disabled() -> Self {
        Self { channel: None }
    }

    /// 沒有設定 endpoint 時不發送任何請求
    pub fn from_endpoint(endpoint: Option<Url>, timeout: Duration) -> Result<Self> {
        Ok(match endpoint {
            Some(url) => Self::new(WebhookChannel::new(url, timeout)?),
            None => Self::disabled(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.channel.is_some()
    }

    pub async fn notify(&self, message: &AlertMessage) -> Result<DeliveryStatus> {
        let Some(channel) = &self.channel else {
            tracing::debug!(domain = %message.domain, "no delivery endpoint configured, skipping");
            return Ok(DeliveryStatus::Disabled);
        };

        channel.deliver(message).await?;
        tracing::info!(
            domain = %message.domain,
            days = message.days_remaining,
            "expiry alert delivered"
        );
        Ok(DeliveryStatus::Delivered)
    }
}
