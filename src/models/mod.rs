//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod credit_score;
pub mod farmer;
pub mod loan;

// Re-export commonly used models
pub use credit_score::{CreditScore, RiskBand};
pub use farmer::{Farmer, UpdateFarmerProfileRequest};
pub use loan::{CreateLoanRequest, Loan, LoanProduct};
