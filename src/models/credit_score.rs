//! Credit score model
//!
//! Scores are computed by an external scoring service and written to the
//! store out of band; this service only ever reads the most recent one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CreditScore {
    pub id: i64,
    pub farmer_id: i64,
    pub score: f64,
    pub score_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Risk band derived from a credit score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 700.0 {
            RiskBand::Low
        } else if score >= 500.0 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskBand::Low => write!(f, "Low Risk"),
            RiskBand::Medium => write!(f, "Medium Risk"),
            RiskBand::High => write!(f, "High Risk"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries_inclusive_on_lower_bound() {
        assert_eq!(RiskBand::from_score(700.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(699.99), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(500.0), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(499.99), RiskBand::High);
    }

    #[test]
    fn test_band_display() {
        assert_eq!(RiskBand::from_score(812.0).to_string(), "Low Risk");
        assert_eq!(RiskBand::from_score(550.0).to_string(), "Medium Risk");
        assert_eq!(RiskBand::from_score(310.0).to_string(), "High Risk");
    }
}
