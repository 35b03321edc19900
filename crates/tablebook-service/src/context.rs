//! Actor context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tablebook_core::types::UserId;
use tablebook_entity::actor::ActorRole;

/// Context for the current authenticated request.
///
/// Built by the HTTP layer from a validated token and passed into every
/// lifecycle operation. The services trust it and only check ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorContext {
    /// The authenticated actor's id.
    pub actor_id: UserId,
    /// The actor's role at the time the token was issued.
    pub role: ActorRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl ActorContext {
    /// Creates a new actor context stamped with the current time.
    pub fn new(actor_id: UserId, role: ActorRole) -> Self {
        Self {
            actor_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Returns whether the actor is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
