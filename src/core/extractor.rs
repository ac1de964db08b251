use crate::domain::model::ExpiryRecord;
use crate::domain::ports::ExpiryExtractor;
use crate::utils::error::{CheckError, Result};
use chrono::{NaiveDate, TimeDelta};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Registry Expiry Date: 2020-07-16T08:02:15Z
static REGISTRY_EXPIRY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Registry Expiry Date: (?P<year>\d+)-(?P<month>\d+)-(?P<day>\d+)T(?P<hour>\d+):(?P<minute>\d+):(?P<second>\d+)Z",
    )
    .expect("registry expiry pattern is a valid regex")
});

/// gTLD thin-registry format (`Registry Expiry Date: YYYY-MM-DDTHH:MM:SSZ`).
///
/// Only the first occurrence in the text is used.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryExpiryDateExtractor;

impl RegistryExpiryDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ExpiryExtractor for RegistryExpiryDateExtractor {
    fn name(&self) -> &str {
        "registry-expiry-date"
    }

    fn extract(&self, text: &str) -> Result<Option<ExpiryRecord>> {
        let Some(caps) = REGISTRY_EXPIRY_DATE.captures(text) else {
            return Ok(None);
        };

        let year: i32 = capture_number(&caps, "year")?;
        let month: u32 = capture_number(&caps, "month")?;
        let day: u32 = capture_number(&caps, "day")?;
        let hour: u32 = capture_number(&caps, "hour")?;
        let minute: u32 = capture_number(&caps, "minute")?;
        let second: u32 = capture_number(&caps, "second")?;

        // 閏秒 :60 視為下一分鐘的 :00
        let (clamped_second, carry) = if second == 60 { (59, 1) } else { (second, 0) };
        let expires_at = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, clamped_second))
            .ok_or_else(|| CheckError::Parse {
                message: format!(
                    "out of range date {:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
                    year, month, day, hour, minute, second
                ),
            })?
            .and_utc()
            + TimeDelta::seconds(carry);

        Ok(Some(ExpiryRecord {
            expires_at,
            matched: caps[0].to_string(),
        }))
    }
}

fn capture_number<T: std::str::FromStr>(caps: &Captures<'_>, group: &str) -> Result<T> {
    let raw = caps.name(group).map(|m| m.as_str()).unwrap_or_default();
    raw.parse().map_err(|_| CheckError::Parse {
        message: format!("{} '{}' is not a valid number", group, raw),
    })
}

/// 依序嘗試各種 registry 格式，回傳第一個找到的結果
pub struct ExtractorChain {
    extractors: Vec<Box<dyn ExpiryExtractor>>,
}

impl ExtractorChain {
    pub fn new(extractors: Vec<Box<dyn ExpiryExtractor>>) -> Self {
        Self { extractors }
    }

    pub fn with(mut self, extractor: impl ExpiryExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn extract(&self, text: &str) -> Result<Option<ExpiryRecord>> {
        for extractor in &self.extractors {
            if let Some(record) = extractor.extract(text)? {
                tracing::debug!(extractor = extractor.name(), "expiry date matched");
                return Ok(Some(record));
            }
        }
        Ok(None)
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new(vec![Box::new(RegistryExpiryDateExtractor::new())])
    }
}
