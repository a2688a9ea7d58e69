//! ShambaCredit USSD Service
//!
//! A USSD-driven credit and loan service for smallholder farmers. The
//! service lets feature-phone users check credit scores, apply for loans,
//! get payment instructions, and update farm profiles through a stateless
//! telecom gateway, reconstructing conversational state from the gateway's
//! session identifier on every hop.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod ussd;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, ShambaCreditError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{NotificationDispatcher, SmsService};
pub use state::{MemorySessionStore, RedisSessionStore, SessionStore, UssdSession};
pub use ussd::{UssdEngine, UssdResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
