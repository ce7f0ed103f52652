// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. Filter precedence: DOCQUERY_LOG, RUST_LOG,
/// then `level`. Logs go to stderr; stdout carries answers only.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_env("DOCQUERY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
