//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod credit_score;
pub mod farmer;
pub mod loan;

// Re-export repositories
pub use credit_score::CreditScoreRepository;
pub use farmer::FarmerRepository;
pub use loan::LoanRepository;
