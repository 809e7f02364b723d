//! JWT-based authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gather_core::error::CoreError;
use gather_core::types::UserId;
use gather_db::models::profile::{Profile, UpsertProfile};
use gather_db::repositories::ProfileRepo;
use gather_db::DbPool;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The identity-provider user id (from `claims.sub`).
    pub user_id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl AuthUser {
    /// Profile fields carried by the token claims.
    pub fn profile_claims(&self) -> UpsertProfile {
        UpsertProfile {
            id: self.user_id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
        }
    }

    /// Mirror the token claims into `profiles`.
    ///
    /// Called before any write that references the user, since events and
    /// feedback rows carry a foreign key to the profile.
    pub async fn sync_profile(&self, pool: &DbPool) -> Result<Profile, sqlx::Error> {
        ProfileRepo::upsert(pool, &self.profile_claims()).await
    }
}

/// Read the bearer token, if any. A present but malformed header is an error.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, AppError> {
    let Some(header) = parts.headers.get("authorization") else {
        return Ok(None);
    };
    let value = header.to_str().map_err(|_| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization header".into(),
        ))
    })?;
    let token = value.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })?;
    Ok(Some(token))
}

fn authenticate(token: &str, state: &AppState) -> Result<AuthUser, AppError> {
    let claims = validate_token(token, &state.config.jwt).map_err(|_| {
        AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
    })?;

    Ok(AuthUser {
        user_id: claims.sub,
        email: claims.email,
        full_name: claims.user_metadata.full_name,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        authenticate(token, state)
    }
}

/// Caller identity for routes open to guests.
///
/// No `Authorization` header yields `None`; an invalid token is still
/// rejected rather than silently treated as a guest.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl OptionalAuthUser {
    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => Ok(OptionalAuthUser(Some(authenticate(token, state)?))),
            None => Ok(OptionalAuthUser(None)),
        }
    }
}
