use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("WHOIS query for {domain} failed: {message}")]
    Query { domain: String, message: String },

    #[error("WHOIS query for {domain} timed out after {timeout:?}")]
    QueryTimeout { domain: String, timeout: Duration },

    #[error("Expiry date parse error: {message}")]
    Parse { message: String },

    #[error("Alert delivery failed: {message}")]
    Delivery { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Registry,
    Parsing,
    Delivery,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// 單一網域的問題，其餘網域照常檢查
    Low,
    /// 可重試 (網路、逾時)
    Medium,
    /// 設定錯誤，需使用者修正
    High,
    /// 系統錯誤
    Critical,
}

impl CheckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CheckError::Query { .. } | CheckError::QueryTimeout { .. } => ErrorCategory::Registry,
            CheckError::Parse { .. } => ErrorCategory::Parsing,
            CheckError::Delivery { .. } | CheckError::Http(_) => ErrorCategory::Delivery,
            CheckError::Config { .. } | CheckError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            CheckError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CheckError::Parse { .. } | CheckError::Delivery { .. } => ErrorSeverity::Low,
            CheckError::Query { .. } | CheckError::QueryTimeout { .. } | CheckError::Http(_) => {
                ErrorSeverity::Medium
            }
            CheckError::Config { .. } | CheckError::InvalidConfigValue { .. } => {
                ErrorSeverity::High
            }
            CheckError::Io(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Registry => {
                "Check network access to port 43 or raise --timeout for slow registries"
            }
            ErrorCategory::Parsing => {
                "The registry response format is not supported; inspect the raw WHOIS output"
            }
            ErrorCategory::Delivery => "Verify the webhook URL and that the endpoint is reachable",
            ErrorCategory::Configuration => "Run with --help to see the expected arguments",
            ErrorCategory::System => "Check file permissions and available resources",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CheckError::QueryTimeout { domain, .. } => {
                format!("{} did not answer in time", domain)
            }
            CheckError::InvalidConfigValue { field, reason, .. } => {
                format!("Invalid value for {}: {}", field, reason)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
