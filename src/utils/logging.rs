//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the ShambaCredit application.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard must be held for the lifetime of the process;
/// dropping it stops the background file writer.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "shambacredit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log one processed USSD hop with structured data
pub fn log_ussd_hop(session_id: &str, phone_number: &str, terminal: bool, duration_ms: u64) {
    info!(
        session_id = session_id,
        phone_number = phone_number,
        terminal = terminal,
        duration_ms = duration_ms,
        "USSD hop processed"
    );
}

/// Log the outcome of an SMS dispatch
pub fn log_sms_result(recipients: usize, accepted: usize, rejected: usize) {
    if rejected > 0 {
        warn!(
            recipients = recipients,
            accepted = accepted,
            rejected = rejected,
            "SMS dispatch partially failed"
        );
    } else {
        info!(
            recipients = recipients,
            accepted = accepted,
            "SMS dispatch completed"
        );
    }
}
