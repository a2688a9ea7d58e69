//! Farmer model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Farmer {
    pub id: i64,
    pub phone_number: String,
    pub full_name: Option<String>,
    pub farm_size_acres: f64,
    pub years_farming: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial profile update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateFarmerProfileRequest {
    pub farm_size_acres: Option<f64>,
    pub years_farming: Option<i32>,
}
