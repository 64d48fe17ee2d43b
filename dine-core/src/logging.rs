//! Logging Infrastructure
//!
//! Structured logging setup shared by binaries and integration tests.

/// Initialize the logger at the default level
pub fn init_logger() {
    init_logger_with_level(None);
}

/// Initialize the logger with an explicit level
pub fn init_logger_with_level(log_level: Option<&str>) {
    let level = log_level.unwrap_or("info");

    tracing_subscriber::fmt()
        .with_max_level(level.parse().unwrap_or(tracing::Level::INFO))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false)
        .init();
}

/// Test-friendly init that tolerates repeated calls
pub fn try_init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
