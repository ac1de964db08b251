pub mod toml_config;

use crate::core::checker::DEFAULT_QUERY_TIMEOUT;
use crate::domain::model::{DomainQuery, ThresholdSet};
use crate::utils::error::{CheckError, Result};
use crate::utils::validation::{
    parse_duration, validate_non_empty, validate_positive_duration, validate_url, Validate,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use toml_config::FileConfig;
use url::Url;

pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Parser)]
#[command(name = "expiry-watch", version)]
#[command(about = "Check domain registration expiry via WHOIS and alert before it lapses")]
pub struct CliConfig {
    /// Comma-separated domain list, e.g. example.com,example.org
    #[arg(value_name = "DOMAIN LIST")]
    pub domains: Option<String>,

    /// Per-domain WHOIS timeout (e.g. 500ms, 5s, 1m30s, 1.5m) [default: 5s]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Days-remaining values that trigger an alert [default: 1,2,3,4,5,6,7,345]
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub notify_days: Vec<i64>,

    /// Webhook that receives markdown alerts; delivery is disabled when unset
    #[arg(long, env = "WECHAT_BOT", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Timeout for the webhook POST [default: 10s]
    #[arg(long, value_parser = parse_duration)]
    pub delivery_timeout: Option<Duration>,

    /// Query this WHOIS server (host[:port]) instead of looking one up
    #[arg(long)]
    pub whois_server: Option<String>,

    /// Evaluate as if the current time were this RFC 3339 instant
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// Fully resolved, read-only settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub domains: Vec<DomainQuery>,
    pub query_timeout: Duration,
    pub delivery_timeout: Duration,
    pub thresholds: ThresholdSet,
    pub webhook_url: Option<Url>,
    pub whois_server: Option<String>,
    pub now: Option<DateTime<Utc>>,
}

impl CliConfig {
    pub fn domain_list(&self) -> Vec<DomainQuery> {
        DomainQuery::parse_list(self.domains.as_deref().unwrap_or_default())
    }

    /// 合併命令列與設定檔，命令列優先
    pub fn resolve(&self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file {}", path.display());
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };

        let domains = self.domain_list();
        if domains.is_empty() {
            return Err(CheckError::Config {
                message: "missing domain list".to_string(),
            });
        }

        let query_timeout = self
            .timeout
            .or(file.check.timeout_seconds.map(Duration::from_secs))
            .unwrap_or(DEFAULT_QUERY_TIMEOUT);
        let delivery_timeout = self
            .delivery_timeout
            .or(file.notify.timeout_seconds.map(Duration::from_secs))
            .unwrap_or(DEFAULT_DELIVERY_TIMEOUT);

        let thresholds = if !self.notify_days.is_empty() {
            ThresholdSet::new(self.notify_days.iter().copied())
        } else {
            match file.check.notify_days {
                Some(days) => ThresholdSet::new(days),
                None => ThresholdSet::default(),
            }
        };

        let webhook_url = non_empty(self.webhook_url.clone())
            .or_else(|| non_empty(file.notify.webhook_url))
            .map(|url| validate_url("webhook_url", &url))
            .transpose()?;

        let whois_server =
            non_empty(self.whois_server.clone()).or_else(|| non_empty(file.check.whois_server));

        let settings = Settings {
            domains,
            query_timeout,
            delivery_timeout,
            thresholds,
            webhook_url,
            whois_server,
            now: self.at,
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty("domains", &self.domains)?;
        validate_positive_duration("timeout", self.query_timeout)?;
        validate_positive_duration("delivery_timeout", self.delivery_timeout)?;
        let days: Vec<i64> = self.thresholds.iter().collect();
        validate_non_empty("notify_days", &days)?;
        Ok(())
    }
}
