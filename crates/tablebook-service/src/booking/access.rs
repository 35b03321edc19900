//! Ownership rules for booking operations.
//!
//! - Admins may do anything.
//! - The owner of the booking's restaurant may view, transition, delete
//!   and record payments.
//! - The booking's customer may view it, move it to `cancelled` or
//!   `completed`, and delete it.
//! - System actors may view bookings and record payments.

use tablebook_core::error::AppError;
use tablebook_core::result::AppResult;
use tablebook_core::types::UserId;
use tablebook_entity::actor::ActorRole;
use tablebook_entity::booking::{Booking, BookingStatus};

use crate::context::ActorContext;

/// An operation on an existing booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    /// Read the booking.
    View,
    /// Change status to the given value.
    Transition(BookingStatus),
    /// Remove the booking.
    Delete,
    /// Update payment status.
    RecordPayment,
}

/// Fail with `Forbidden` unless `ctx` may perform `action` on `booking`.
pub fn authorize(
    ctx: &ActorContext,
    booking: &Booking,
    restaurant_owner: UserId,
    action: BookingAction,
) -> AppResult<()> {
    if ctx.is_admin() || ctx.actor_id == restaurant_owner {
        return Ok(());
    }

    let allowed = if ctx.role == ActorRole::System {
        matches!(action, BookingAction::View | BookingAction::RecordPayment)
    } else if ctx.actor_id == booking.customer_id {
        match action {
            BookingAction::View | BookingAction::Delete => true,
            BookingAction::Transition(next) => {
                matches!(next, BookingStatus::Cancelled | BookingStatus::Completed)
            }
            BookingAction::RecordPayment => false,
        }
    } else {
        false
    };

    if allowed {
        Ok(())
    } else {
        Err(AppError::forbidden(match action {
            BookingAction::Transition(_) if ctx.actor_id == booking.customer_id => {
                "Customers may only cancel or complete their own bookings".to_string()
            }
            _ => format!("Not permitted to access booking {}", booking.id),
        }))
    }
}

/// Fail with `Forbidden` unless `ctx` may manage the restaurant.
pub fn authorize_restaurant(ctx: &ActorContext, restaurant_owner: UserId) -> AppResult<()> {
    if ctx.is_admin() || ctx.actor_id == restaurant_owner {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Only the restaurant owner may list its bookings",
        ))
    }
}
