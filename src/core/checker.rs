use crate::adapters::clock::SystemClock;
use crate::core::extractor::ExtractorChain;
use crate::core::notifier::Notifier;
use crate::core::policy::NotificationPolicy;
use crate::domain::model::{
    AlertMessage, CheckOutcome, DeliveryStatus, DomainQuery, DomainReport, RunReport,
};
use crate::domain::ports::{Clock, RegistryClient};
use crate::utils::error::{CheckError, Result};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::timeout;

pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs WHOIS → extract → decide → notify for each domain in turn.
///
/// A failing domain is reported and skipped; it never stops the run.
pub struct ExpiryChecker<R: RegistryClient> {
    registry: R,
    extractors: ExtractorChain,
    policy: NotificationPolicy,
    notifier: Notifier,
    clock: Box<dyn Clock>,
    query_timeout: Duration,
    // 告警行的輸出目的地，預設 stdout
    output: Mutex<Box<dyn Write + Send>>,
}

impl<R: RegistryClient> ExpiryChecker<R> {
    pub fn new(registry: R, policy: NotificationPolicy, notifier: Notifier) -> Self {
        Self {
            registry,
            extractors: ExtractorChain::default(),
            policy,
            notifier,
            clock: Box::new(SystemClock),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            output: Mutex::new(Box::new(std::io::stdout())),
        }
    }

    pub fn with_extractors(mut self, extractors: ExtractorChain) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn with_output(mut self, output: impl Write + Send + 'static) -> Self {
        self.output = Mutex::new(Box::new(output));
        self
    }

    pub async fn run(&self, domains: &[DomainQuery]) -> RunReport {
        tracing::info!("Checking {} domain(s)", domains.len());

        let mut report = RunReport::default();
        for domain in domains {
            let result = self.check_domain(domain).await;
            if let Err(e) = &result {
                tracing::warn!(
                    domain = %domain,
                    category = ?e.category(),
                    "check failed, continuing with next domain: {}",
                    e
                );
            }
            report.domains.push(DomainReport {
                domain: domain.clone(),
                result,
            });
        }

        tracing::info!(
            checked = report.checked(),
            alerted = report.alerted().count(),
            failed = report.failed().count(),
            "run finished"
        );
        report
    }

    pub async fn check_domain(&self, domain: &DomainQuery) -> Result<CheckOutcome> {
        // timer 隨 future 結束一起釋放
        let text = match timeout(self.query_timeout, self.registry.query(domain)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(CheckError::QueryTimeout {
                    domain: domain.to_string(),
                    timeout: self.query_timeout,
                })
            }
        };
        tracing::debug!(domain = %domain, bytes = text.len(), "registry response received");

        let Some(record) = self.extractors.extract(&text)? else {
            tracing::warn!(domain = %domain, "no expiry date found in registry response");
            return Ok(CheckOutcome::NoExpiryDate);
        };

        let decision = self.policy.evaluate(record, self.clock.now());
        tracing::debug!(
            domain = %domain,
            days = decision.days_remaining,
            trigger = decision.trigger,
            "expiry evaluated"
        );

        if !decision.trigger {
            return Ok(CheckOutcome::Quiet { decision });
        }

        let message = AlertMessage::new(domain, &decision);
        self.write_alert_line(&message.console_line());

        let delivery = match self.notifier.notify(&message).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(domain = %domain, "alert delivery failed: {}", e);
                DeliveryStatus::Failed(e.to_string())
            }
        };

        Ok(CheckOutcome::Alerted { decision, delivery })
    }

    fn write_alert_line(&self, line: &str) {
        let mut output = self
            .output
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(output, "{}", line).and_then(|_| output.flush()) {
            tracing::warn!("failed to write alert line: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::FixedClock;
    use crate::domain::model::ThresholdSet;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const SAMPLE: &str = "Domain Name: EXAMPLE.COM\nRegistry Expiry Date: 2020-07-16T08:02:15Z\n";

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct StubRegistry {
        replies: HashMap<&'static str, Reply>,
    }

    #[async_trait]
    impl RegistryClient for StubRegistry {
        async fn query(&self, domain: &DomainQuery) -> Result<String> {
            match self.replies.get(domain.as_str()) {
                Some(Reply::Text(text)) => Ok(text.to_string()),
                Some(Reply::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(String::new())
                }
                Some(Reply::Fail) | None => Err(CheckError::Query {
                    domain: domain.to_string(),
                    message: "connection refused".to_string(),
                }),
            }
        }
    }

    fn checker(replies: Vec<(&'static str, Reply)>) -> ExpiryChecker<StubRegistry> {
        let registry = StubRegistry {
            replies: replies.into_iter().collect(),
        };
        ExpiryChecker::new(registry, NotificationPolicy::default(), Notifier::disabled())
            .with_clock(FixedClock(Utc.with_ymd_and_hms(2020, 7, 13, 8, 2, 15).unwrap()))
            .with_query_timeout(Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_three_days_left_alerts() {
        let checker = checker(vec![("example.com", Reply::Text(SAMPLE))]);

        let outcome = checker
            .check_domain(&DomainQuery::new("example.com"))
            .await
            .unwrap();

        match outcome {
            CheckOutcome::Alerted { decision, delivery } => {
                assert_eq!(decision.days_remaining, 3);
                assert_eq!(delivery, DeliveryStatus::Disabled);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_alert_line_written_only_when_triggered() {
        let buffer = SharedBuffer::default();
        let checker = checker(vec![
            ("example.com", Reply::Text(SAMPLE)),
            ("example.org", Reply::Text("Registry Expiry Date: 2020-07-21T08:02:15Z\n")),
        ])
        .with_output(buffer.clone());

        let report = checker
            .run(&DomainQuery::parse_list("example.com,example.org"))
            .await;

        assert_eq!(report.alerted().count(), 1);
        assert_eq!(
            buffer.contents(),
            "example.com will expired after 3 days -> Registry Expiry Date: 2020-07-16T08:02:15Z.\n"
        );
    }

    #[tokio::test]
    async fn test_missing_expiry_is_not_an_error() {
        let checker = checker(vec![("example.de", Reply::Text("Domain: example.de\nStatus: connect\n"))]);

        let outcome = checker
            .check_domain(&DomainQuery::new("example.de"))
            .await
            .unwrap();
        assert_eq!(outcome, CheckOutcome::NoExpiryDate);
    }

    #[tokio::test]
    async fn test_malformed_date_is_parse_error() {
        let checker = checker(vec![(
            "example.com",
            Reply::Text("Registry Expiry Date: 2020-13-16T08:02:15Z\n"),
        )]);

        let err = checker
            .check_domain(&DomainQuery::new("example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_hanging_query_times_out() {
        let checker = checker(vec![("slow.com", Reply::Hang)]);

        let err = checker
            .check_domain(&DomainQuery::new("slow.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, CheckError::QueryTimeout { .. }));
    }

    #[tokio::test]
    async fn test_run_continues_after_failures() {
        let checker = checker(vec![
            ("slow.com", Reply::Hang),
            ("broken.com", Reply::Fail),
            ("example.com", Reply::Text(SAMPLE)),
        ]);
        let domains = DomainQuery::parse_list("slow.com,broken.com,example.com");

        let report = checker.run(&domains).await;

        assert_eq!(report.checked(), 3);
        assert_eq!(report.failed().count(), 2);
        let alerted: Vec<&str> = report.alerted().map(|r| r.domain.as_str()).collect();
        assert_eq!(alerted, vec!["example.com"]);
    }

    #[tokio::test]
    async fn test_custom_thresholds_are_used() {
        let registry = StubRegistry {
            replies: [("example.com", Reply::Text(SAMPLE))].into_iter().collect(),
        };
        let checker = ExpiryChecker::new(
            registry,
            NotificationPolicy::new(ThresholdSet::new([30])),
            Notifier::disabled(),
        )
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2020, 7, 13, 8, 2, 15).unwrap()));

        let outcome = checker
            .check_domain(&DomainQuery::new("example.com"))
            .await
            .unwrap();
        assert!(matches!(outcome, CheckOutcome::Quiet { ref decision } if decision.days_remaining == 3));
    }
}
