//! Farmer repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::farmer::{Farmer, UpdateFarmerProfileRequest};
use crate::utils::errors::ShambaCreditError;

#[derive(Debug, Clone)]
pub struct FarmerRepository {
    pool: PgPool,
}

impl FarmerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new farmer with a zeroed profile
    pub async fn create(&self, phone_number: &str) -> Result<Farmer, ShambaCreditError> {
        let farmer = sqlx::query_as::<_, Farmer>(
            r#"
            INSERT INTO farmers (phone_number, farm_size_acres, years_farming, created_at, updated_at)
            VALUES ($1, 0, 0, $2, $3)
            RETURNING id, phone_number, full_name, farm_size_acres, years_farming, created_at, updated_at
            "#
        )
        .bind(phone_number)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(farmer)
    }

    /// Find farmer by phone number
    pub async fn find_by_phone(&self, phone_number: &str) -> Result<Option<Farmer>, ShambaCreditError> {
        let farmer = sqlx::query_as::<_, Farmer>(
            "SELECT id, phone_number, full_name, farm_size_acres, years_farming, created_at, updated_at FROM farmers WHERE phone_number = $1"
        )
        .bind(phone_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(farmer)
    }

    /// Update farmer profile fields
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateFarmerProfileRequest,
    ) -> Result<Farmer, ShambaCreditError> {
        let farmer = sqlx::query_as::<_, Farmer>(
            r#"
            UPDATE farmers
            SET farm_size_acres = COALESCE($2, farm_size_acres),
                years_farming = COALESCE($3, years_farming),
                updated_at = $4
            WHERE id = $1
            RETURNING id, phone_number, full_name, farm_size_acres, years_farming, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.farm_size_acres)
        .bind(request.years_farming)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(farmer)
    }
}
