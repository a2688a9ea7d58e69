//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;

use crate::utils::errors::{Result, ShambaCreditError};

/// Normalize an MSISDN to a bare international form.
///
/// Strips whitespace and dashes, then requires 9-15 digits with an
/// optional leading `+`. The USSD gateway is expected to deliver numbers
/// in international format already; anything else is rejected.
pub fn normalize_phone(raw: &str) -> Result<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    let pattern = Regex::new(r"^\+?[0-9]{9,15}$")
        .map_err(|_| ShambaCreditError::Config("Invalid MSISDN pattern".to_string()))?;

    if pattern.is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(ShambaCreditError::InvalidInput(format!(
            "Invalid phone number: {}",
            raw
        )))
    }
}

/// Generate a short loan reference number suitable for SMS and USSD text.
pub fn generate_reference() -> String {
    let mut rng = rand::thread_rng();
    format!("FL{:08}", rng.gen_range(0..100_000_000u32))
}

/// Format a timestamp for user display
pub fn format_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d %b %Y").to_string()
}
