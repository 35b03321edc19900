//! Fee calculator.
//!
//! The fee is the restaurant's base-fee policy applied to the party size.
//! Tables among the `top_tables` most booked ones for the restaurant get the
//! configured markup, rounded half away from zero to a whole currency unit.
//! When the ranking cannot be computed the base fee is charged and the
//! quote is flagged `degraded`.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use tracing::{debug, warn};

use tablebook_core::config::PricingConfig;
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{RestaurantId, TableId};
use tablebook_database::store::{BookingStore, RestaurantDirectory, TableUsage};
use tablebook_entity::booking::{BookingStatus, FeeSnapshot};

use super::policy::{PerGuestPricing, PricingPolicy};

/// A priced table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    /// Amount to charge.
    pub fee: Decimal,
    /// Fee before markup.
    pub base_fee: Decimal,
    /// Whether the popularity markup was applied.
    pub markup_applied: bool,
    /// Whether the popularity ranking was unavailable.
    pub degraded: bool,
}

impl From<FeeQuote> for FeeSnapshot {
    fn from(quote: FeeQuote) -> Self {
        FeeSnapshot {
            fee: quote.fee,
            base_fee: quote.base_fee,
            markup_applied: quote.markup_applied,
            pricing_degraded: quote.degraded,
        }
    }
}

/// Rank tables by booking count, descending, ties by table id ascending,
/// and keep the first `top_n` that have at least one booking.
pub fn rank_popular_tables(usage: &[TableUsage], top_n: usize) -> Vec<TableId> {
    let mut ranked: Vec<TableUsage> = usage.iter().filter(|u| u.bookings > 0).copied().collect();
    ranked.sort_by(|a, b| {
        b.bookings
            .cmp(&a.bookings)
            .then(a.table_id.cmp(&b.table_id))
    });
    ranked.into_iter().take(top_n).map(|u| u.table_id).collect()
}

/// Prices tables for a party.
#[derive(Clone)]
pub struct FeeCalculator {
    bookings: Arc<dyn BookingStore>,
    directory: Arc<dyn RestaurantDirectory>,
    config: PricingConfig,
    popularity_statuses: Vec<BookingStatus>,
    default_policy: Arc<dyn PricingPolicy>,
    policies: HashMap<RestaurantId, Arc<dyn PricingPolicy>>,
}

impl std::fmt::Debug for FeeCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeCalculator")
            .field("config", &self.config)
            .field("popularity_statuses", &self.popularity_statuses)
            .finish_non_exhaustive()
    }
}

impl FeeCalculator {
    /// Creates a fee calculator. Fails if a popularity status name is unknown.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn RestaurantDirectory>,
        config: PricingConfig,
    ) -> AppResult<Self> {
        let popularity_statuses = config
            .popularity_statuses
            .iter()
            .map(|s| {
                s.parse::<BookingStatus>().map_err(|_| {
                    AppError::configuration(format!(
                        "pricing.popularity_statuses: unknown booking status '{s}'"
                    ))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            bookings,
            directory,
            config,
            popularity_statuses,
            default_policy: Arc::new(PerGuestPricing),
            policies: HashMap::new(),
        })
    }

    /// Use a custom base-fee policy for one restaurant.
    pub fn with_policy(
        mut self,
        restaurant_id: RestaurantId,
        policy: Arc<dyn PricingPolicy>,
    ) -> Self {
        self.policies.insert(restaurant_id, policy);
        self
    }

    /// Compute the fee for `guest_count` guests at `table_id`.
    ///
    /// Fails with `NotFound` for an unknown restaurant or a table that is not
    /// on its active floor plan. A failing popularity lookup never fails the
    /// quote.
    pub async fn compute_fee(
        &self,
        restaurant_id: RestaurantId,
        table_id: TableId,
        guest_count: u32,
    ) -> AppResult<FeeQuote> {
        if guest_count == 0 {
            return Err(AppError::invalid_field(
                "guest_count",
                "Guest count must be at least 1",
            ));
        }

        let restaurant = self.directory.get_restaurant(restaurant_id).await?;
        let tables = self.directory.list_tables(restaurant_id).await?;
        if !tables.iter().any(|t| t.id == table_id) {
            return Err(AppError::not_found(format!(
                "Table {table_id} not found in restaurant {restaurant_id}"
            ))
            .with_details(serde_json::json!({ "field": "table_id" })));
        }

        let rate = restaurant.base_rate.unwrap_or(self.config.base_rate);
        let base_fee = self.policy_for(restaurant_id).base_fee(guest_count, rate);

        let usage = match self
            .bookings
            .table_usage(restaurant_id, &self.popularity_statuses)
            .await
        {
            Ok(usage) => usage,
            Err(e) => {
                warn!(
                    restaurant_id = %restaurant_id,
                    error = %e,
                    "Popularity ranking unavailable, charging base fee"
                );
                return Ok(FeeQuote {
                    fee: base_fee,
                    base_fee,
                    markup_applied: false,
                    degraded: true,
                });
            }
        };

        let popular = rank_popular_tables(&usage, self.config.top_tables);
        let markup_applied = popular.contains(&table_id);
        let fee = if markup_applied {
            (base_fee * self.config.markup_factor)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        } else {
            base_fee
        };

        debug!(
            restaurant_id = %restaurant_id,
            table_id = %table_id,
            guest_count,
            %base_fee,
            %fee,
            markup_applied,
            "Fee computed"
        );

        Ok(FeeQuote {
            fee,
            base_fee,
            markup_applied,
            degraded: false,
        })
    }

    fn policy_for(&self, restaurant_id: RestaurantId) -> &dyn PricingPolicy {
        let policy = self
            .policies
            .get(&restaurant_id)
            .unwrap_or(&self.default_policy);
        &**policy
    }
}
