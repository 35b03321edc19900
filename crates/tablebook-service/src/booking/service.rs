//! Booking lifecycle manager.
//!
//! Every change to a booking goes through here. Writes are optimistic:
//! each operation reads the booking, validates against that snapshot and
//! writes back at the version it read. A stale write re-reads and
//! re-validates, up to `booking.max_transition_retries` times.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info, warn};

use tablebook_core::config::BookingConfig;
use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::{BookingId, RestaurantId};
use tablebook_database::store::{BookingFilter, BookingScope, BookingStore, RestaurantDirectory};
use tablebook_entity::booking::{
    Booking, BookingHistory, BookingStatus, HistoryAction, HistoryEntry, PaymentStatus,
};

use super::access::{self, BookingAction};
use super::params::CreateBookingParams;
use super::reference::generate_reference;
use super::stats::BookingListing;
use crate::availability::AvailabilityChecker;
use crate::context::ActorContext;
use crate::notification::{NotificationDispatcher, StatusChangeNotice};
use crate::pricing::FeeCalculator;

/// Owns booking creation, status transitions, history and deletion.
#[derive(Clone)]
pub struct BookingLifecycle {
    bookings: Arc<dyn BookingStore>,
    directory: Arc<dyn RestaurantDirectory>,
    availability: Arc<AvailabilityChecker>,
    pricing: Arc<FeeCalculator>,
    notifications: NotificationDispatcher,
    config: BookingConfig,
}

impl std::fmt::Debug for BookingLifecycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingLifecycle")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BookingLifecycle {
    /// Creates a new lifecycle manager.
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        directory: Arc<dyn RestaurantDirectory>,
        availability: Arc<AvailabilityChecker>,
        pricing: Arc<FeeCalculator>,
        notifications: NotificationDispatcher,
        config: BookingConfig,
    ) -> Self {
        Self {
            bookings,
            directory,
            availability,
            pricing,
            notifications,
            config,
        }
    }

    /// Create a pending booking for the acting customer.
    ///
    /// The slot is checked up front for a descriptive conflict, then
    /// re-checked atomically by the store at insert time. Losing that race
    /// yields `Conflict`; it is never retried here.
    pub async fn create(
        &self,
        ctx: &ActorContext,
        params: CreateBookingParams,
    ) -> AppResult<Booking> {
        params.check(self.config.max_guest_count)?;

        self.availability
            .ensure_free(
                params.restaurant_id,
                params.table_id,
                params.date,
                params.window,
            )
            .await?;

        let quote = self
            .pricing
            .compute_fee(params.restaurant_id, params.table_id, params.guest_count)
            .await?;

        let now = Utc::now();
        let reference = generate_reference(&self.config.reference_prefix);

        let mut history = BookingHistory::new();
        history.append(HistoryEntry {
            action: HistoryAction::Created,
            actor_role: ctx.role,
            actor_id: ctx.actor_id.into_uuid(),
            previous_status: None,
            new_status: BookingStatus::Pending,
            timestamp: now,
            details: Some(json!({
                "reference": reference,
                "fee": quote.fee,
                "markup_applied": quote.markup_applied,
            })),
        });

        let booking = Booking {
            id: BookingId::new(),
            reference,
            restaurant_id: params.restaurant_id,
            customer_id: ctx.actor_id,
            table_id: params.table_id,
            booking_date: params.date,
            start_time: params.window.start,
            end_time: params.window.end,
            guest_count: i32::try_from(params.guest_count)
                .map_err(|_| AppError::invalid_field("guest_count", "Guest count is too large"))?,
            customer: params.customer_info(),
            pricing: quote.into(),
            payment_status: PaymentStatus::Unpaid,
            payment_reference: None,
            status: BookingStatus::Pending,
            history,
            special_requests: params
                .special_requests
                .filter(|s| !s.trim().is_empty()),
            version: 1,
            created_at: now,
            updated_at: now,
        };

        let booking = self.bookings.insert_if_available(&booking).await?;

        info!(
            booking_id = %booking.id,
            reference = %booking.reference,
            restaurant_id = %booking.restaurant_id,
            table_id = %booking.table_id,
            date = %booking.booking_date,
            window = %booking.window(),
            fee = %booking.pricing.fee,
            "Booking created"
        );

        Ok(booking)
    }

    /// Fetch a booking the actor may view.
    pub async fn get(&self, ctx: &ActorContext, booking_id: BookingId) -> AppResult<Booking> {
        let booking = self.load(booking_id).await?;
        self.authorize(ctx, &booking, BookingAction::View).await?;
        Ok(booking)
    }

    /// Move a booking to `new_status`.
    ///
    /// A transition to the current status succeeds without touching the
    /// booking. Unreachable statuses fail with `InvalidTransition`.
    pub async fn transition(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        new_status: BookingStatus,
    ) -> AppResult<Booking> {
        let mut stale_writes = 0;
        loop {
            let current = self.load(booking_id).await?;
            self.authorize(ctx, &current, BookingAction::Transition(new_status))
                .await?;

            if current.status == new_status {
                debug!(booking_id = %booking_id, status = %new_status, "Transition is a no-op");
                return Ok(current);
            }

            if !current.status.can_transition_to(new_status) {
                return Err(AppError::invalid_transition(format!(
                    "Cannot move booking from {} to {}",
                    current.status, new_status
                ))
                .with_details(json!({
                    "from": current.status,
                    "to": new_status,
                })));
            }

            let previous = current.status;
            let now = Utc::now();
            let mut next = current.clone();
            next.status = new_status;
            next.updated_at = now;
            next.history.append(HistoryEntry {
                action: HistoryAction::Modified,
                actor_role: ctx.role,
                actor_id: ctx.actor_id.into_uuid(),
                previous_status: Some(previous),
                new_status,
                timestamp: now,
                details: None,
            });

            match self.bookings.update_versioned(&next, current.version).await? {
                Some(saved) => {
                    info!(
                        booking_id = %booking_id,
                        from = %previous,
                        to = %new_status,
                        actor_role = %ctx.role,
                        "Booking status changed"
                    );
                    if new_status.notifies_customer() {
                        self.notifications
                            .dispatch(StatusChangeNotice::from_booking(&saved, previous));
                    }
                    return Ok(saved);
                }
                None => {
                    stale_writes += 1;
                    self.check_retry_budget(booking_id, stale_writes)?;
                }
            }
        }
    }

    /// Delete a cancelled or completed booking.
    pub async fn delete(&self, ctx: &ActorContext, booking_id: BookingId) -> AppResult<()> {
        let mut stale_writes = 0;
        loop {
            let current = self.load(booking_id).await?;
            self.authorize(ctx, &current, BookingAction::Delete).await?;

            if !current.status.is_terminal() {
                return Err(AppError::precondition_failed(
                    "only cancelled or completed bookings can be deleted",
                )
                .with_details(json!({ "status": current.status })));
            }

            if self
                .bookings
                .delete_terminal(booking_id, current.version)
                .await?
            {
                info!(booking_id = %booking_id, actor_role = %ctx.role, "Booking deleted");
                return Ok(());
            }

            stale_writes += 1;
            self.check_retry_budget(booking_id, stale_writes)?;
        }
    }

    /// Update the payment status of a booking.
    ///
    /// Recording the status it already has (with no new provider reference)
    /// is a no-op.
    pub async fn record_payment(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        payment_status: PaymentStatus,
        provider_reference: Option<String>,
    ) -> AppResult<Booking> {
        let provider_reference = provider_reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let mut stale_writes = 0;
        loop {
            let current = self.load(booking_id).await?;
            self.authorize(ctx, &current, BookingAction::RecordPayment)
                .await?;

            let reference_unchanged = provider_reference.is_none()
                || provider_reference == current.payment_reference;
            if current.payment_status == payment_status && reference_unchanged {
                return Ok(current);
            }

            let now = Utc::now();
            let mut next = current.clone();
            next.payment_status = payment_status;
            if provider_reference.is_some() {
                next.payment_reference = provider_reference.clone();
            }
            next.updated_at = now;
            next.history.append(HistoryEntry {
                action: HistoryAction::Payment,
                actor_role: ctx.role,
                actor_id: ctx.actor_id.into_uuid(),
                previous_status: Some(current.status),
                new_status: current.status,
                timestamp: now,
                details: Some(json!({
                    "previous_payment_status": current.payment_status,
                    "payment_status": payment_status,
                    "payment_reference": next.payment_reference,
                })),
            });

            match self.bookings.update_versioned(&next, current.version).await? {
                Some(saved) => {
                    info!(
                        booking_id = %booking_id,
                        payment_status = %payment_status,
                        "Booking payment recorded"
                    );
                    return Ok(saved);
                }
                None => {
                    stale_writes += 1;
                    self.check_retry_budget(booking_id, stale_writes)?;
                }
            }
        }
    }

    /// Bookings of a restaurant the actor manages, with statistics.
    pub async fn list_for_restaurant(
        &self,
        ctx: &ActorContext,
        restaurant_id: RestaurantId,
        filter: BookingFilter,
    ) -> AppResult<BookingListing> {
        check_filter(&filter)?;
        let owner = self.directory.get_owner_id(restaurant_id).await?;
        access::authorize_restaurant(ctx, owner)?;

        let bookings = self
            .bookings
            .query(BookingScope::Restaurant(restaurant_id), &filter)
            .await?;
        Ok(BookingListing::new(bookings))
    }

    /// The actor's own bookings, with statistics.
    pub async fn list_for_customer(
        &self,
        ctx: &ActorContext,
        filter: BookingFilter,
    ) -> AppResult<BookingListing> {
        check_filter(&filter)?;
        let bookings = self
            .bookings
            .query(BookingScope::Customer(ctx.actor_id), &filter)
            .await?;
        Ok(BookingListing::new(bookings))
    }

    async fn load(&self, booking_id: BookingId) -> AppResult<Booking> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))
    }

    async fn authorize(
        &self,
        ctx: &ActorContext,
        booking: &Booking,
        action: BookingAction,
    ) -> AppResult<()> {
        let owner = self.directory.get_owner_id(booking.restaurant_id).await?;
        access::authorize(ctx, booking, owner, action)
    }

    fn check_retry_budget(&self, booking_id: BookingId, stale_writes: u32) -> AppResult<()> {
        if stale_writes > self.config.max_transition_retries {
            warn!(
                booking_id = %booking_id,
                attempts = stale_writes,
                "Giving up after repeated concurrent modifications"
            );
            return Err(AppError::conflict(format!(
                "Booking {booking_id} is being modified concurrently, try again"
            )));
        }
        debug!(booking_id = %booking_id, attempt = stale_writes, "Stale write, retrying");
        Ok(())
    }
}

fn check_filter(filter: &BookingFilter) -> AppResult<()> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(AppError::invalid_field(
                "date_from",
                format!("date_from {from} is after date_to {to}"),
            ));
        }
    }
    Ok(())
}
