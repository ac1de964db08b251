use crate::utils::error::{CheckError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env placeholder pattern is valid"));

/// Optional `expiry-watch.toml`; every field can also be given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub check: CheckSection,
    #[serde(default)]
    pub notify: NotifySection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckSection {
    pub timeout_seconds: Option<u64>,
    pub notify_days: Option<Vec<i64>>,
    pub whois_server: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifySection {
    pub webhook_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

impl FileConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CheckError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WECHAT_BOT})
    ///
    /// Unset variables become an empty string, so an unset webhook variable
    /// simply disables delivery.
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| {
                    tracing::debug!("environment variable {} is not set", var_name);
                    String::new()
                })
            })
            .into_owned()
    }
}
