//! Loan repository implementation

use chrono::{Months, Utc};
use sqlx::PgPool;

use crate::models::loan::{CreateLoanRequest, Loan, STATUS_ACTIVE, STATUS_PENDING};
use crate::utils::errors::ShambaCreditError;

#[derive(Debug, Clone)]
pub struct LoanRepository {
    pool: PgPool,
}

impl LoanRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new loan in pending status
    pub async fn create(&self, request: CreateLoanRequest) -> Result<Loan, ShambaCreditError> {
        let now = Utc::now();
        let next_payment_date = now.checked_add_months(Months::new(1));

        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (farmer_id, credit_score_id, reference, product, amount, term_months, monthly_payment, status, next_payment_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, farmer_id, credit_score_id, reference, product, amount, term_months, monthly_payment, status, next_payment_date, created_at
            "#,
        )
        .bind(request.farmer_id)
        .bind(request.credit_score_id)
        .bind(request.reference)
        .bind(request.product)
        .bind(request.amount)
        .bind(request.term_months)
        .bind(request.monthly_payment)
        .bind(STATUS_PENDING)
        .bind(next_payment_date)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(loan)
    }

    /// Find the farmer's open loan, newest first. A loan counts as open
    /// while it is pending review or actively being repaid; status moves
    /// are made by external collaborators, never by the USSD flows.
    pub async fn find_open_by_farmer(
        &self,
        farmer_id: i64,
    ) -> Result<Option<Loan>, ShambaCreditError> {
        let loan = sqlx::query_as::<_, Loan>(
            "SELECT id, farmer_id, credit_score_id, reference, product, amount, term_months, monthly_payment, status, next_payment_date, created_at FROM loans WHERE farmer_id = $1 AND status IN ($2, $3) ORDER BY created_at DESC LIMIT 1"
        )
        .bind(farmer_id)
        .bind(STATUS_PENDING)
        .bind(STATUS_ACTIVE)
        .fetch_optional(&self.pool)
        .await?;

        Ok(loan)
    }
}
