//! Structured logging.
//!
//! Uses `tracing-subscriber` with an `EnvFilter`; `RUST_LOG` takes
//! precedence over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for a configured level, scoped to this crate and tower-http.
pub fn default_directive(log_level: &str) -> String {
    format!("kaspawallet={level},tower_http={level}", level = log_level)
}

/// Install the global subscriber. Logs go to stderr so stdout stays for command output.
pub fn init(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(log_level)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();

    if let Err(e) = result {
        eprintln!("logging already initialized: {}", e);
    }
}
