//! Caller identity from the Authorization header
//!
//! Handlers take an `AuthUser` argument; extraction rejects the request
//! before the handler runs when the bearer token is absent or bad.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use rooms_core::Snowflake;

use crate::response::ApiError;
use crate::state::AppState;

/// Identity of the authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

impl AuthUser {
    pub fn new(user_id: Snowflake) -> Self {
        Self { user_id }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .map(|TypedHeader(Authorization(bearer))| bearer)
            .map_err(|_| ApiError::MissingAuth)?;

        let app_state = AppState::from_ref(state);
        let jwt = app_state.jwt_service();

        let claims = jwt.validate_token(bearer.token()).map_err(|e| {
            tracing::warn!(error = %e, "Rejected bearer token");
            ApiError::InvalidAuthFormat
        })?;

        let user_id = claims.user_id().map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a user ID");
            ApiError::InvalidAuthFormat
        })?;

        Ok(Self::new(user_id))
    }
}
