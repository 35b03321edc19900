//! Restaurant directory repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use tablebook_core::error::{AppError, ErrorKind};
use tablebook_core::result::AppResult;
use tablebook_core::types::RestaurantId;
use tablebook_entity::restaurant::{DiningTable, Restaurant};

use crate::store::RestaurantDirectory;

/// Read-only repository over `restaurants` and `dining_tables`.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: PgPool,
}

impl RestaurantRepository {
    /// Create a new restaurant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantDirectory for RestaurantRepository {
    async fn find_restaurant(&self, id: RestaurantId) -> AppResult<Option<Restaurant>> {
        sqlx::query_as::<_, Restaurant>("SELECT * FROM restaurants WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find restaurant", e)
            })
    }

    async fn list_tables(&self, restaurant_id: RestaurantId) -> AppResult<Vec<DiningTable>> {
        sqlx::query_as::<_, DiningTable>(
            "SELECT * FROM dining_tables WHERE restaurant_id = $1 AND is_active ORDER BY label",
        )
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tables", e))
    }
}
