//! Error handling for ShambaCredit
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the ShambaCredit application
#[derive(Error, Debug)]
pub enum ShambaCreditError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SMS gateway error: {0}")]
    Sms(#[from] SmsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// SMS provider specific errors
#[derive(Error, Debug)]
pub enum SmsError {
    #[error("SMS API request failed: {0}")]
    RequestFailed(String),

    #[error("SMS API timeout")]
    Timeout,

    #[error("Invalid SMS API response: {0}")]
    InvalidResponse(String),

    #[error("SMS gateway unavailable")]
    ServiceUnavailable,

    #[error("Message rejected for {number}: {status}")]
    Rejected { number: String, status: String },
}

/// Result type alias for ShambaCredit operations
pub type Result<T> = std::result::Result<T, ShambaCreditError>;

/// Result type alias for SMS operations
pub type SmsResult<T> = std::result::Result<T, SmsError>;
