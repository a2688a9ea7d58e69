//! Data gateway seam between the menu state machine and the store
//!
//! The engine never talks to sqlx directly; everything it needs from the
//! relational store goes through this trait. Absence is a `None`, never an
//! error, with one exception: the farmer lookup creates a zeroed profile
//! on a miss.

use async_trait::async_trait;

use crate::database::DatabaseService;
use crate::models::credit_score::CreditScore;
use crate::models::farmer::{Farmer, UpdateFarmerProfileRequest};
use crate::models::loan::{CreateLoanRequest, Loan};
use crate::utils::errors::Result;

#[async_trait]
pub trait FarmerGateway: Send + Sync {
    /// Look up a farmer by phone number, creating one on first contact
    async fn farmer_by_phone(&self, phone_number: &str) -> Result<Farmer>;

    /// Most recent credit score for a farmer, by score date descending
    async fn latest_credit_score(&self, farmer_id: i64) -> Result<Option<CreditScore>>;

    /// The farmer's open loan, if any
    async fn open_loan(&self, farmer_id: i64) -> Result<Option<Loan>>;

    /// Create a loan in pending status
    async fn create_loan(&self, request: CreateLoanRequest) -> Result<Loan>;

    /// Apply a partial profile update
    async fn update_profile(
        &self,
        farmer_id: i64,
        request: UpdateFarmerProfileRequest,
    ) -> Result<Farmer>;
}

#[async_trait]
impl FarmerGateway for DatabaseService {
    async fn farmer_by_phone(&self, phone_number: &str) -> Result<Farmer> {
        self.register_farmer(phone_number).await
    }

    async fn latest_credit_score(&self, farmer_id: i64) -> Result<Option<CreditScore>> {
        self.credit_scores.latest_for_farmer(farmer_id).await
    }

    async fn open_loan(&self, farmer_id: i64) -> Result<Option<Loan>> {
        self.loans.find_open_by_farmer(farmer_id).await
    }

    async fn create_loan(&self, request: CreateLoanRequest) -> Result<Loan> {
        self.loans.create(request).await
    }

    async fn update_profile(
        &self,
        farmer_id: i64,
        request: UpdateFarmerProfileRequest,
    ) -> Result<Farmer> {
        self.farmers.update_profile(farmer_id, request).await
    }
}
