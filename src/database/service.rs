//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{CreditScoreRepository, DatabasePool, FarmerRepository, LoanRepository};
use crate::models::Farmer;
use crate::utils::errors::ShambaCreditError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub farmers: FarmerRepository,
    pub credit_scores: CreditScoreRepository,
    pub loans: LoanRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            farmers: FarmerRepository::new(pool.clone()),
            credit_scores: CreditScoreRepository::new(pool.clone()),
            loans: LoanRepository::new(pool),
        }
    }

    /// Look up a farmer by phone number, creating a zeroed profile on
    /// first contact. This is the one lookup where absence is not an
    /// error.
    pub async fn register_farmer(&self, phone_number: &str) -> Result<Farmer, ShambaCreditError> {
        if let Some(existing) = self.farmers.find_by_phone(phone_number).await? {
            return Ok(existing);
        }

        self.farmers.create(phone_number).await
    }
}
