//! Credit score repository implementation

use sqlx::PgPool;

use crate::models::credit_score::CreditScore;
use crate::utils::errors::ShambaCreditError;

#[derive(Debug, Clone)]
pub struct CreditScoreRepository {
    pool: PgPool,
}

impl CreditScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the most recent credit score for a farmer, if any
    pub async fn latest_for_farmer(
        &self,
        farmer_id: i64,
    ) -> Result<Option<CreditScore>, ShambaCreditError> {
        let score = sqlx::query_as::<_, CreditScore>(
            "SELECT id, farmer_id, score, score_date, created_at FROM credit_scores WHERE farmer_id = $1 ORDER BY score_date DESC LIMIT 1"
        )
        .bind(farmer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(score)
    }
}
