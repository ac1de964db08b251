use clap::{CommandFactory, Parser};
use expiry_watch::adapters::{FixedClock, WhoisClient};
use expiry_watch::utils::error::{CheckError, ErrorSeverity};
use expiry_watch::utils::logger;
use expiry_watch::{CliConfig, ExpiryChecker, NotificationPolicy, Notifier};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.domain_list().is_empty() {
        eprintln!("{}", CliConfig::command().render_help());
        std::process::exit(1);
    }

    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => fail(e),
    };
    tracing::debug!(
        "Resolved {} domain(s), query timeout {:?}, thresholds {:?}",
        settings.domains.len(),
        settings.query_timeout,
        settings.thresholds.iter().collect::<Vec<_>>()
    );

    let notifier = match Notifier::from_endpoint(
        settings.webhook_url.clone(),
        settings.delivery_timeout,
    ) {
        Ok(notifier) => notifier,
        Err(e) => fail(e),
    };
    if !notifier.is_enabled() {
        tracing::info!("No webhook configured, alerts are printed only");
    }

    let mut registry = WhoisClient::new().with_timeout(settings.query_timeout);
    if let Some(server) = &settings.whois_server {
        registry = registry.with_server(server.clone());
    }

    let mut checker = ExpiryChecker::new(
        registry,
        NotificationPolicy::new(settings.thresholds.clone()),
        notifier,
    )
    .with_query_timeout(settings.query_timeout);
    if let Some(now) = settings.now {
        tracing::info!("Evaluating as of {}", now);
        checker = checker.with_clock(FixedClock(now));
    }

    // 單一網域失敗不影響結束碼
    let report = checker.run(&settings.domains).await;
    for failed in report.failed() {
        if let Err(e) = &failed.result {
            eprintln!("Error: {}: {}", failed.domain, e.user_friendly_message());
        }
    }
}

fn fail(e: CheckError) -> ! {
    tracing::error!(
        "Setup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("Error: {}", e.user_friendly_message());
    eprintln!("Hint: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}
