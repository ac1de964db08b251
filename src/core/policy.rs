use crate::domain::model::{ExpiryRecord, NotificationDecision, ThresholdSet};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct NotificationPolicy {
    thresholds: ThresholdSet,
}

impl NotificationPolicy {
    pub fn new(thresholds: ThresholdSet) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Whole days left until `expires_at`, truncated toward zero.
    ///
    /// 23 hours left is day 0, and anything already expired is negative.
    pub fn days_remaining(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (expires_at - now).num_hours() / 24
    }

    pub fn evaluate(&self, record: ExpiryRecord, now: DateTime<Utc>) -> NotificationDecision {
        let days_remaining = Self::days_remaining(record.expires_at, now);
        NotificationDecision {
            trigger: self.thresholds.contains(days_remaining),
            days_remaining,
            record,
        }
    }
}
