//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub sms: SmsConfig,
    pub payments: PaymentConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration for the USSD callback endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Redis configuration for the session store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    /// Idle USSD sessions are dropped after this many seconds. The telecom
    /// gateway itself times out in well under a minute, so this only needs
    /// to outlive the slowest realistic menu walk.
    pub session_ttl_seconds: u64,
}

/// SMS gateway API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    pub api_url: String,
    pub username: String,
    pub api_key: String,
    pub sender_id: Option<String>,
    pub timeout_seconds: u64,
}

/// Payment instruction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PaymentConfig {
    /// M-Pesa paybill number rendered in payment instructions
    pub paybill: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SHAMBACREDIT"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ShambaCreditError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/shambacredit".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "shambacredit:".to_string(),
                session_ttl_seconds: 300,
            },
            sms: SmsConfig {
                api_url: "https://api.africastalking.com/version1/messaging".to_string(),
                username: "sandbox".to_string(),
                api_key: String::new(),
                sender_id: None,
                timeout_seconds: 5,
            },
            payments: PaymentConfig {
                paybill: "877444".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "/var/log/shambacredit".to_string(),
            },
        }
    }
}
