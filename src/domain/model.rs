use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainQuery(String);

impl DomainQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// 以逗號切分網域清單，保留輸入順序
    ///
    /// Each segment is trimmed and empty segments are dropped, so a trailing
    /// comma or `"a.com, b.com"` behave as expected.
    pub fn parse_list(input: &str) -> Vec<DomainQuery> {
        input
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(DomainQuery::new)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Expiry timestamp found in a registry response, with the literal text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryRecord {
    pub expires_at: DateTime<Utc>,
    pub matched: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThresholdSet(BTreeSet<i64>);

pub const DEFAULT_NOTIFY_DAYS: [i64; 8] = [1, 2, 3, 4, 5, 6, 7, 345];

impl ThresholdSet {
    pub fn new(days: impl IntoIterator<Item = i64>) -> Self {
        Self(days.into_iter().collect())
    }

    pub fn contains(&self, days_remaining: i64) -> bool {
        self.0.contains(&days_remaining)
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFY_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDecision {
    pub trigger: bool,
    pub days_remaining: i64,
    pub record: ExpiryRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub domain: String,
    pub days_remaining: i64,
    pub matched: String,
}

impl AlertMessage {
    pub fn new(domain: &DomainQuery, decision: &NotificationDecision) -> Self {
        Self {
            domain: domain.as_str().to_string(),
            days_remaining: decision.days_remaining,
            matched: decision.record.matched.clone(),
        }
    }

    /// 推送到 webhook 的 markdown 內容
    pub fn markdown(&self) -> String {
        format!(
            "{} <font color=\"warning\">{}</font>天后过期：\n>{}\n",
            self.domain, self.days_remaining, self.matched
        )
    }

    pub fn console_line(&self) -> String {
        format!(
            "{} will expired after {} days -> {}.",
            self.domain, self.days_remaining, self.matched
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// No endpoint configured, nothing was sent.
    Disabled,
    Delivered,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    Alerted {
        decision: NotificationDecision,
        delivery: DeliveryStatus,
    },
    Quiet {
        decision: NotificationDecision,
    },
    NoExpiryDate,
}

#[derive(Debug)]
pub struct DomainReport {
    pub domain: DomainQuery,
    pub result: crate::utils::error::Result<CheckOutcome>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub domains: Vec<DomainReport>,
}

impl RunReport {
    pub fn alerted(&self) -> impl Iterator<Item = &DomainReport> {
        self.domains
            .iter()
            .filter(|r| matches!(r.result, Ok(CheckOutcome::Alerted { .. })))
    }

    pub fn failed(&self) -> impl Iterator<Item = &DomainReport> {
        self.domains.iter().filter(|r| r.result.is_err())
    }

    pub fn checked(&self) -> usize {
        self.domains.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_decision(days: i64) -> NotificationDecision {
        NotificationDecision {
            trigger: true,
            days_remaining: days,
            record: ExpiryRecord {
                expires_at: Utc.with_ymd_and_hms(2020, 7, 16, 8, 2, 15).unwrap(),
                matched: "Registry Expiry Date: 2020-07-16T08:02:15Z".to_string(),
            },
        }
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let domains = DomainQuery::parse_list("a.com,b.com,c.com");
        let names: Vec<&str> = domains.iter().map(|d| d.as_str()).collect();
        assert_eq!(names, vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_parse_list_trims_and_skips_empty_segments() {
        let domains = DomainQuery::parse_list(" a.com, ,b.com,");
        assert_eq!(domains, vec![DomainQuery::new("a.com"), DomainQuery::new("b.com")]);
        assert!(DomainQuery::parse_list(",").is_empty());
        assert!(DomainQuery::parse_list("").is_empty());
    }

    #[test]
    fn test_default_thresholds() {
        let thresholds = ThresholdSet::default();
        for day in 1..=7 {
            assert!(thresholds.contains(day));
        }
        assert!(thresholds.contains(345));
        assert!(!thresholds.contains(0));
        assert!(!thresholds.contains(8));
        assert!(!thresholds.contains(-1));
    }

    #[test]
    fn test_alert_message_formats() {
        let message = AlertMessage::new(&DomainQuery::new("example.com"), &sample_decision(3));

        assert_eq!(
            message.console_line(),
            "example.com will expired after 3 days -> Registry Expiry Date: 2020-07-16T08:02:15Z."
        );
        assert_eq!(
            message.markdown(),
            "example.com <font color=\"warning\">3</font>天后过期：\n>Registry Expiry Date: 2020-07-16T08:02:15Z\n"
        );
    }
}
