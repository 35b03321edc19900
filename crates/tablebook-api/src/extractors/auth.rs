//! `AuthUser` extractor: pulls the bearer token from the Authorization
//! header, validates it and injects the actor context.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use tablebook_core::error::AppError;
use tablebook_service::ActorContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated actor available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub ActorContext);

impl AuthUser {
    /// Returns the inner `ActorContext`.
    pub fn context(&self) -> &ActorContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = ActorContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let claims = state.jwt_decoder.decode_access_token(token)?;

        Ok(AuthUser(ActorContext::new(claims.actor_id(), claims.role)))
    }
}
