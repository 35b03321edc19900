//! In-memory restaurant directory backed by `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use tablebook_core::result::AppResult;
use tablebook_core::types::RestaurantId;
use tablebook_entity::restaurant::{DiningTable, Restaurant};

use crate::store::RestaurantDirectory;

/// In-memory restaurant directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryRestaurantDirectory {
    restaurants: Arc<DashMap<RestaurantId, Restaurant>>,
    tables: Arc<DashMap<RestaurantId, Vec<DiningTable>>>,
}

impl MemoryRestaurantDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a restaurant.
    pub fn insert_restaurant(&self, restaurant: Restaurant) {
        self.restaurants.insert(restaurant.id, restaurant);
    }

    /// Place a table on its restaurant's floor plan, replacing any table
    /// with the same id.
    pub fn insert_table(&self, table: DiningTable) {
        let mut tables = self.tables.entry(table.restaurant_id).or_default();
        tables.retain(|t| t.id != table.id);
        tables.push(table);
    }
}

#[async_trait]
impl RestaurantDirectory for MemoryRestaurantDirectory {
    async fn find_restaurant(&self, id: RestaurantId) -> AppResult<Option<Restaurant>> {
        Ok(self.restaurants.get(&id).map(|r| r.value().clone()))
    }

    async fn list_tables(&self, restaurant_id: RestaurantId) -> AppResult<Vec<DiningTable>> {
        let mut tables: Vec<DiningTable> = self
            .tables
            .get(&restaurant_id)
            .map(|t| t.iter().filter(|t| t.is_active).cloned().collect())
            .unwrap_or_default();
        tables.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(tables)
    }
}
