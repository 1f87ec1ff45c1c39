use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use uuid::Uuid;

use crate::{auth::jwt, error::AppError, state::AppState};

/// Authenticated caller, extracted from a `Bearer` token in the
/// `Authorization` header
///
/// Taking this as a handler parameter makes the route require
/// authentication; everything below the routing layer receives the user id
/// from here and never re-derives identity.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The caller's user id, from the token's `sub` claim.
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Expected `Bearer <token>` authorization".to_string())
        })?;

        let claims = jwt::validate_token(token, &state.jwt)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser {
            user_id: claims.sub,
        })
    }
}
