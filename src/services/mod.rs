//! Services module
//!
//! This module contains outbound integrations

pub mod notification;
pub mod sms;

// Re-export commonly used services
pub use notification::{loan_submitted_message, NotificationDispatcher};
pub use sms::{SmsDeliveryReport, SmsService};
