//! HTTP handlers module
//!
//! This module contains the axum handlers for the inbound USSD gateway
//! callback and the service health check.

pub mod ussd;

// Re-export commonly used handler components
pub use ussd::{create_router, AppState, UssdCallback};
