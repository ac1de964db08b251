use crate::domain::model::{AlertMessage, DomainQuery, ExpiryRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Fetches the raw registry text for one domain.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    async fn query(&self, domain: &DomainQuery) -> Result<String>;
}

/// One known registry text format.
///
/// `Ok(None)` means the format was not found in the text; `Err` means it was
/// found but its values are unusable.
pub trait ExpiryExtractor: Send + Sync {
    fn name(&self) -> &str;
    fn extract(&self, text: &str) -> Result<Option<ExpiryRecord>>;
}

#[async_trait]
pub trait AlertChannel: Send + Sync {
    async fn deliver(&self, message: &AlertMessage) -> Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
