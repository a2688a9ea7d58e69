//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{Result, ShambaCreditError};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_redis_config(&settings.redis)?;
    validate_sms_config(&settings.sms)?;
    validate_payment_config(&settings.payments)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate HTTP server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(ShambaCreditError::Config(
            "Server host is required".to_string(),
        ));
    }

    if config.port == 0 {
        return Err(ShambaCreditError::Config(
            "Server port must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ShambaCreditError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(ShambaCreditError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(ShambaCreditError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(ShambaCreditError::Config(
            "Redis URL is required".to_string(),
        ));
    }

    if config.session_ttl_seconds < 60 {
        return Err(ShambaCreditError::Config(
            "Session TTL below 60 seconds would cut off in-flight menu walks".to_string(),
        ));
    }

    Ok(())
}

/// Validate SMS gateway configuration
fn validate_sms_config(config: &super::SmsConfig) -> Result<()> {
    if config.api_url.is_empty() {
        return Err(ShambaCreditError::Config(
            "SMS API URL is required".to_string(),
        ));
    }

    if config.username.is_empty() {
        return Err(ShambaCreditError::Config(
            "SMS API username is required".to_string(),
        ));
    }

    if config.api_key.is_empty() {
        return Err(ShambaCreditError::Config(
            "SMS API key is required".to_string(),
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(ShambaCreditError::Config(
            "SMS timeout must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate payment instruction configuration
fn validate_payment_config(config: &super::PaymentConfig) -> Result<()> {
    if config.paybill.is_empty() || !config.paybill.chars().all(|c| c.is_ascii_digit()) {
        return Err(ShambaCreditError::Config(
            "Paybill must be a non-empty numeric string".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(ShambaCreditError::Config(
            "Log level is required".to_string(),
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(ShambaCreditError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.sms.api_key = "test-key".to_string();
        settings
    }

    #[test]
    fn test_default_settings_with_api_key_validate() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_missing_sms_api_key_rejected() {
        let settings = Settings::default();
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_short_session_ttl_rejected() {
        let mut settings = valid_settings();
        settings.redis.session_ttl_seconds = 10;
        assert!(validate_settings(&settings).is_err());
    }

    #[test]
    fn test_non_numeric_paybill_rejected() {
        let mut settings = valid_settings();
        settings.payments.paybill = "PAY-123".to_string();
        assert!(validate_settings(&settings).is_err());
    }
}
