//! Handler for the caller's own profile.

use axum::extract::State;
use axum::Json;
use gather_db::models::profile::Profile;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
///
/// Refreshes the profile from the token claims and returns it.
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = user.sync_profile(&state.pool).await?;
    Ok(Json(DataResponse { data: profile }))
}
