//! Loan model, product catalog and repayment terms

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Annual interest rate applied to every product
pub const ANNUAL_INTEREST_RATE: f64 = 0.15;

/// Fixed repayment term for USSD applications
pub const TERM_MONTHS: i32 = 12;

/// Fraction of the product maximum granted on a USSD application
pub const PRINCIPAL_FRACTION: f64 = 0.5;

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Loan {
    pub id: i64,
    pub farmer_id: i64,
    pub credit_score_id: Option<i64>,
    pub reference: String,
    pub product: String,
    pub amount: f64,
    pub term_months: i32,
    pub monthly_payment: f64,
    pub status: String,
    pub next_payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLoanRequest {
    pub farmer_id: i64,
    pub credit_score_id: Option<i64>,
    pub reference: String,
    pub product: String,
    pub amount: f64,
    pub term_months: i32,
    pub monthly_payment: f64,
}

/// Flat repayment schedule: principal plus one year of simple interest
/// split evenly across the term. This mirrors the product as offered over
/// USSD; it is not an amortizing schedule.
pub fn monthly_payment(amount: f64, term_months: i32) -> f64 {
    amount * (1.0 + ANNUAL_INTEREST_RATE) / term_months as f64
}

/// A loan product offered on the USSD menu
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanProduct {
    pub code: &'static str,
    pub name: &'static str,
    pub max_amount: f64,
}

const CATALOG: [LoanProduct; 3] = [
    LoanProduct {
        code: "1",
        name: "Farm Inputs Loan",
        max_amount: 50_000.0,
    },
    LoanProduct {
        code: "2",
        name: "Equipment Loan",
        max_amount: 200_000.0,
    },
    LoanProduct {
        code: "3",
        name: "Emergency Loan",
        max_amount: 30_000.0,
    },
];

impl LoanProduct {
    pub fn catalog() -> &'static [LoanProduct] {
        &CATALOG
    }

    /// Resolve a menu selection to a product
    pub fn by_choice(choice: &str) -> Option<&'static LoanProduct> {
        CATALOG.iter().find(|p| p.code == choice)
    }
}
