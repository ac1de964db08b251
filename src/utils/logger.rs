use std::io::Stderr;
use tracing_subscriber::fmt::{
    self,
    format::{DefaultFields, Format},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "expiry_watch=info";
const VERBOSE_DIRECTIVES: &str = "expiry_watch=debug,info";

// RUST_LOG 優先，否則用預設
fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

// stdout 保留給告警輸出，日誌一律寫到 stderr
fn stderr_layer<S>() -> fmt::Layer<S, DefaultFields, Format, fn() -> Stderr> {
    fmt::layer()
        .with_writer(std::io::stderr as fn() -> Stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    let directives = if verbose {
        VERBOSE_DIRECTIVES
    } else {
        DEFAULT_DIRECTIVES
    };

    tracing_subscriber::registry()
        .with(env_filter(directives))
        .with(stderr_layer().compact())
        .init();
}

/// JSON lines on stderr, for log shippers when run from a scheduler.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVES))
        .with(stderr_layer().json())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_layers_build_scoped_subscribers() {
        let compact = tracing_subscriber::registry()
            .with(EnvFilter::new(VERBOSE_DIRECTIVES))
            .with(stderr_layer().compact());
        tracing::subscriber::with_default(compact, || {
            tracing::debug!(domain = "example.com", "compact layer");
        });

        let json = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_DIRECTIVES))
            .with(stderr_layer().json());
        tracing::subscriber::with_default(json, || {
            tracing::info!(days = 3, "json layer");
        });
    }

    #[test]
    fn test_default_directives_parse() {
        for directives in [DEFAULT_DIRECTIVES, VERBOSE_DIRECTIVES] {
            assert!(directives.parse::<EnvFilter>().is_ok(), "{}", directives);
        }
    }
}
